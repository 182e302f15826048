use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot};

use crate::color::{generate_palette, medal_color};
use crate::data::aggregate::{MedalTable, MedalTally};
use crate::data::model::{FieldValue, MedalType};

const BAR_WIDTH: f64 = 0.7;

// ---------------------------------------------------------------------------
// Medal bar chart
// ---------------------------------------------------------------------------

/// Bar chart of the top `max_bars` groups of `medals`, either stacked by
/// medal type or one total bar per group.
pub fn medal_chart(ui: &mut Ui, id: &str, title: &str, medals: &MedalTable, stacked: bool, max_bars: usize) {
    let ranked: Vec<(&FieldValue, MedalTally)> = medals.ranked().into_iter().take(max_bars).collect();
    if ranked.is_empty() {
        ui.label("No medals match the current filters.");
        return;
    }
    let labels: Vec<String> = ranked.iter().map(|(k, _)| k.to_string()).collect();

    ui.strong(title);
    Plot::new(id)
        .legend(Legend::default())
        .height(400.0)
        .y_axis_label("Number of Medals")
        .x_axis_label(medals.group_by().title())
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            axis_label(&labels, mark.value)
        })
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            if stacked {
                let mut below: Vec<BarChart> = Vec::new();
                for medal in MedalType::ALL {
                    let bars = ranked
                        .iter()
                        .enumerate()
                        .map(|(i, (key, tally))| {
                            Bar::new(i as f64, tally.get(medal) as f64)
                                .width(BAR_WIDTH)
                                .name(format!("{key} – {medal}"))
                        })
                        .collect();
                    let others: Vec<&BarChart> = below.iter().collect();
                    let chart = BarChart::new(bars)
                        .name(medal.label())
                        .color(medal_color(medal))
                        .stack_on(&others);
                    below.push(chart);
                }
                for chart in below {
                    plot_ui.bar_chart(chart);
                }
            } else {
                let palette = generate_palette(ranked.len());
                let bars = ranked
                    .iter()
                    .zip(palette)
                    .enumerate()
                    .map(|(i, ((key, tally), color))| {
                        Bar::new(i as f64, tally.total() as f64)
                            .width(BAR_WIDTH)
                            .fill(color)
                            .name(key.to_string())
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name("Medals Total"));
            }
        });
}

/// Group label for an x-axis grid mark; blank between bars.
fn axis_label(labels: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}
