//! Rendering only: every widget reads from or sends events to `AppState`.
pub mod panels;
pub mod plot;
pub mod report;
pub mod tables;
