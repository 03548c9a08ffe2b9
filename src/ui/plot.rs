use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints, Points};

use crate::state::AppState;

const TREND_BLUE: Color32 = Color32::from_rgb(31, 119, 180);

// ---------------------------------------------------------------------------
// Live publication trend of the current selection
// ---------------------------------------------------------------------------

/// Publications per year for the records passing the current filters.
pub fn selection_trend(ui: &mut Ui, state: &AppState) {
    let years = &state.visible_years;
    if years.by_year.is_empty() {
        ui.label(RichText::new("No dated records in the current selection.").weak());
        return;
    }

    let points: Vec<[f64; 2]> = years
        .points()
        .into_iter()
        .map(|(year, count)| [year as f64, count as f64])
        .collect();

    Plot::new("selection_trend")
        .height(260.0)
        .legend(egui_plot::Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Number of Publications")
        .x_axis_formatter(|mark, _range| {
            if mark.value.fract() == 0.0 {
                format!("{:.0}", mark.value)
            } else {
                String::new()
            }
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("Selected records")
                    .color(TREND_BLUE)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .color(TREND_BLUE)
                    .radius(4.0),
            );
        });

    if years.unknown > 0 {
        ui.label(RichText::new(format!("{} selected records have no known date", years.unknown)).weak());
    }
}
