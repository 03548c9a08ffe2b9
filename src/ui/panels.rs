use eframe::egui::{self, Color32, RichText, ScrollArea, Sense, Ui};
use egui_extras::DatePickerButton;

use crate::color::to_color32;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.loaded.is_none() {
        ui.label("No metadata loaded.");
        return;
    }

    date_range(ui, state);
    ui.separator();
    journal_select(ui, state);
}

fn date_range(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Select Date Range");

    let Some(range) = state.filters.date_range else {
        ui.label(RichText::new("No dated records").weak());
        return;
    };

    let mut start = range.start;
    let mut end = range.end;

    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        if ui
            .add(DatePickerButton::new(&mut start).id_salt("start_date"))
            .changed()
        {
            state.set_start_date(start);
        }
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("To   ");
        if ui
            .add(DatePickerButton::new(&mut end).id_salt("end_date"))
            .changed()
        {
            state.set_end_date(end);
        }
    });

    if let Some(bounds) = state.date_bounds {
        ui.label(RichText::new(format!("Data spans {} to {}", bounds.start, bounds.end)).weak());
    }
    if state.filters.date_range.is_some_and(|r| r.is_empty()) {
        ui.label(RichText::new("Start is after end: nothing matches").color(Color32::YELLOW));
    }
}

fn journal_select(ui: &mut Ui, state: &mut AppState) {
    let n_selected = state.filters.journals.len();
    let n_total = state.journal_options.len();
    ui.strong(format!("Select Journals  ({n_selected}/{n_total})"));

    ui.add(
        egui::TextEdit::singleline(&mut state.journal_search)
            .hint_text("Search journals…"),
    );

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_journals();
        }
        if ui.small_button("None").clicked() {
            state.select_no_journals();
        }
    });

    // Clone the matches so the loop can toggle selections.
    let options: Vec<String> = state.matching_journals().cloned().collect();
    let mut toggled = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for journal in &options {
                ui.horizontal(|ui: &mut Ui| {
                    // Swatch only for journals on the top-journals chart.
                    let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), Sense::hover());
                    if let Some(c) = state.color_map.color_for(journal) {
                        ui.painter().rect_filled(rect, 2.0, to_color32(c));
                    }

                    let mut checked = state.filters.journals.contains(journal);
                    if ui.checkbox(&mut checked, journal.as_str()).changed() {
                        toggled = Some(journal.clone());
                    }
                    if let Some(n) = state.visible_journals.get(journal) {
                        ui.label(RichText::new(n.to_string()).weak());
                    }
                });
            }
        });

    if let Some(journal) = toggled {
        state.toggle_journal(&journal);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(loaded) = &state.loaded {
            ui.label(format!(
                "{} records loaded, {} visible",
                loaded.table.len(),
                state.visible_count()
            ));
        }

        if state.source_changed {
            ui.separator();
            if ui
                .button(RichText::new("Source changed, reload").color(Color32::YELLOW))
                .clicked()
            {
                state.reload();
            }
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open paper metadata")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(path);
    }
}
