use anyhow::{anyhow, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::cache::TableCache;
use crate::config::Config;
use crate::present::Presenter;
use crate::state::AppState;
use crate::ui::gallery::ChartGallery;
use crate::ui::{panels, plot, table};

const APP_TITLE: &str = "CORD-19 Research Analysis";

const DESCRIPTION: &str = "A basic analysis of the CORD-19 research metadata. \
Explore publication trends and top journals, and filter the records by date and journal.";

/// Seconds between checks of the source file's modification time.
const SOURCE_CHECK_INTERVAL: f64 = 2.0;

// ---------------------------------------------------------------------------
// Interactive presenter
// ---------------------------------------------------------------------------

/// Opens the dashboard window and blocks until it is closed.
#[derive(Debug, Default)]
pub struct InteractivePresenter;

impl Presenter for InteractivePresenter {
    fn present(self, cache: TableCache, config: &Config) -> Result<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(APP_TITLE)
                .with_inner_size([1280.0, 900.0])
                .with_min_inner_size([720.0, 480.0]),
            ..Default::default()
        };

        let app = ExplorerApp::new(cache, config);
        eframe::run_native(APP_TITLE, options, Box::new(|_cc| Ok(Box::new(app))))
            .map_err(|e| anyhow!("dashboard failed: {e}"))
    }
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExplorerApp {
    pub state: AppState,
    gallery: ChartGallery,
    last_source_check: f64,
}

impl ExplorerApp {
    pub fn new(cache: TableCache, config: &Config) -> Self {
        Self {
            state: AppState::new(cache, config),
            gallery: ChartGallery::new(config),
            last_source_check: 0.0,
        }
    }

    fn poll_source(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        if now - self.last_source_check >= SOURCE_CHECK_INTERVAL {
            self.last_source_check = now;
            self.state.check_source();
        }
        ctx.request_repaint_after(std::time::Duration::from_secs_f64(SOURCE_CHECK_INTERVAL));
    }

    fn error_panel(&mut self, ui: &mut Ui, message: &str) {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add_space(60.0);
            ui.heading(RichText::new("Could not load metadata").color(Color32::RED));
            ui.add_space(8.0);
            ui.label(message);
            ui.label(
                RichText::new(format!("Looked for {}", self.state.cache.path().display())).weak(),
            );
            ui.add_space(12.0);
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Retry").clicked() {
                    self.state.reload();
                }
                if ui.button("Open…").clicked() {
                    panels::open_file_dialog(&mut self.state);
                }
            });
        });
    }

    fn dashboard(&mut self, ui: &mut Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| {
                ui.heading(RichText::new(APP_TITLE).size(28.0));
                ui.label(DESCRIPTION);
                ui.add_space(8.0);

                ui.label(RichText::new("Total Articles in Selected Range").weak());
                ui.label(RichText::new(self.state.visible_count().to_string()).size(32.0).strong());
                ui.add_space(12.0);

                self.gallery.show(ui);

                ui.heading("Selection Trend");
                ui.separator();
                plot::selection_trend(ui, &self.state);
                ui.add_space(12.0);

                ui.heading("Filtered Data");
                ui.separator();
                if let Some(view) = self.state.view() {
                    table::filtered_table(ui, &view);
                }
            });
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.ensure_loaded();
        self.poll_source(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // A failed load replaces the whole dashboard.
        if let Some(message) = self.state.load_error.clone() {
            egui::CentralPanel::default().show(ctx, |ui| {
                self.error_panel(ui, &message);
            });
            return;
        }

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metric, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard(ui);
        });

        self.state.finish_frame();
    }
}
