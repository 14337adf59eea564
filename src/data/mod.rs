/// Data layer: core types, loading, and aggregation.
///
/// Architecture:
/// ```text
///   one .csv per country
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, tag rows with Country → ObservationTable
///   └──────────┘
///        │  concat
///        ▼
///   ┌──────────────────┐
///   │ ObservationTable │  columns + rows of CellValue
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary   │  group by Country → mean / median / std per metric
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  mean, median, sample std, rounding, box quartiles
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod stats;
pub mod summary;
