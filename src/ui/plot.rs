use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Plot};

use crate::chart::{BarChartSpec, Orientation};

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Render one bar chart with its title above it.
pub fn bar_chart(ui: &mut Ui, spec: &BarChartSpec) {
    ui.strong(&spec.title);

    let colors = spec.colors();
    let bars: Vec<Bar> = spec
        .bars
        .iter()
        .zip(colors)
        .map(|(b, color)| {
            Bar::new(b.position, b.value)
                .name(&b.label)
                .fill(color)
                .width(spec.bar_width)
        })
        .collect();

    let mut chart = BarChart::new(bars).name(&spec.title);
    if spec.orientation == Orientation::Horizontal {
        chart = chart.horizontal();
    }

    let mut plot = Plot::new(&spec.id)
        .height(spec.height)
        .x_axis_label(spec.x_label.clone())
        .y_axis_label(spec.y_label.clone())
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false);

    if spec.categorical {
        let labels = spec.labels();
        let format = move |mark: egui_plot::GridMark, _range: &std::ops::RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        };
        plot = match spec.orientation {
            Orientation::Horizontal => plot.y_axis_formatter(format),
            Orientation::Vertical => plot.x_axis_formatter(format),
        };
    }

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(chart);
    });
    ui.add_space(8.0);
}

/// Axis label for a category position; blank between categories.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}
