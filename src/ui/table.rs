use eframe::egui::{RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::TableView;

const ROW_HEIGHT: f32 = 18.0;

/// Longest cell text shown before it is cut; the full text is on hover.
const CELL_CHARS: usize = 120;

fn cell_text(text: &str) -> String {
    if text.chars().count() <= CELL_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(CELL_CHARS - 1).collect();
        format!("{head}…")
    }
}

/// Scrollable table of the filtered records.
pub fn filtered_table(ui: &mut Ui, view: &TableView<'_>) {
    if view.is_empty() {
        ui.label(RichText::new("No records match the current filters.").weak());
        return;
    }

    let extras = view.extra_columns();

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .min_scrolled_height(0.0)
            .max_scroll_height(400.0)
            .column(Column::auto())
            .column(Column::initial(320.0).clip(true))
            .column(Column::initial(180.0).clip(true))
            .column(Column::auto())
            .column(Column::initial(400.0).clip(true))
            .columns(Column::initial(140.0).clip(true), extras.len())
            .header(20.0, |mut header| {
                let fixed = ["#", "title", "journal", "publish_time", "abstract"];
                for name in fixed.iter().copied().chain(extras.iter().map(String::as_str)) {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, view.len(), |mut row| {
                    let Some(record) = view.get(row.index()) else {
                        return;
                    };
                    let n = row.index();
                    row.col(|ui| {
                        ui.label(n.to_string());
                    });
                    row.col(|ui| {
                        ui.label(cell_text(&record.title)).on_hover_text(&record.title);
                    });
                    row.col(|ui| {
                        ui.label(cell_text(&record.journal));
                    });
                    row.col(|ui| {
                        ui.label(record.publish_time.to_string());
                    });
                    row.col(|ui| {
                        ui.label(cell_text(&record.abstract_text))
                            .on_hover_text(&record.abstract_text);
                    });
                    for column in extras {
                        row.col(|ui| {
                            ui.label(record.extra.get(column).map_or("", String::as_str));
                        });
                    }
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_cells_are_cut() {
        let text = "word ".repeat(100);
        assert_eq!(cell_text(&text).chars().count(), CELL_CHARS);
        assert_eq!(cell_text("short"), "short");
    }
}
