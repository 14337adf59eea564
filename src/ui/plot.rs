use eframe::egui::{Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, MarkerShape, Plot, PlotPoints,
    Points,
};

use crate::color::CountryColors;
use crate::dashboard::Distribution;
use crate::data::model::Metric;

const PLOT_HEIGHT: f32 = 320.0;
const OUTLIER_RADIUS: f32 = 2.5;

/// Axis formatter that prints category names at integer positions.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Distribution (box plot per country)
// ---------------------------------------------------------------------------

/// One box per country for the selected metric, outliers drawn as dots.
pub fn distribution_plot(ui: &mut Ui, distribution: &Distribution, colors: &CountryColors) {
    let labels: Vec<String> = distribution.boxes.iter().map(|(c, _)| c.clone()).collect();
    let metric = distribution.metric;

    Plot::new("distribution_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Country")
        .y_axis_label(metric.column())
        .x_axis_formatter(category_formatter(labels))
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (country, stats)) in distribution.boxes.iter().enumerate() {
                let Some(b) = stats else {
                    continue;
                };
                let color = colors.color_for(country);
                let spread = BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker);
                let elem = BoxElem::new(i as f64, spread)
                    .name(format!("{country} (n = {})", b.count))
                    .fill(color.linear_multiply(0.3))
                    .stroke(Stroke::new(1.5, color))
                    .box_width(0.5)
                    .whisker_width(0.3);

                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(country).color(color));

                if !b.outliers.is_empty() {
                    let x = i as f64;
                    let points: Vec<[f64; 2]> = b.outliers.iter().map(|&v| [x, v]).collect();
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .name(country)
                            .color(color)
                            .shape(MarkerShape::Circle)
                            .radius(OUTLIER_RADIUS),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Ranking (bar chart of mean values)
// ---------------------------------------------------------------------------

/// Bars in ranking order, highest mean first. Countries without a value are
/// drawn as an empty slot.
pub fn ranking_chart(
    ui: &mut Ui,
    metric: Metric,
    ranking: &[(String, Option<f64>)],
    colors: &CountryColors,
) {
    let labels: Vec<String> = ranking.iter().map(|(c, _)| c.clone()).collect();

    let bars: Vec<Bar> = ranking
        .iter()
        .enumerate()
        .filter_map(|(i, (country, mean))| {
            let mean = (*mean)?;
            Some(
                Bar::new(i as f64, mean)
                    .name(country)
                    .fill(colors.color_for(country))
                    .width(0.6),
            )
        })
        .collect();

    Plot::new("ranking_plot")
        .height(PLOT_HEIGHT)
        .x_axis_label("Country")
        .y_axis_label(format!("Mean {metric}"))
        .x_axis_formatter(category_formatter(labels))
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(format!("Mean {metric}")));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_integer_marks() {
        let fmt = category_formatter(vec!["Benin".into(), "Togo".into()]);
        let range = 0.0..=1.0;
        let mark = |value: f64| GridMark {
            value,
            step_size: 0.5,
        };

        assert_eq!(fmt(mark(0.0), &range), "Benin");
        assert_eq!(fmt(mark(1.0), &range), "Togo");
        assert_eq!(fmt(mark(0.5), &range), "");
        assert_eq!(fmt(mark(2.0), &range), "");
        assert_eq!(fmt(mark(-1.0), &range), "");
    }
}
