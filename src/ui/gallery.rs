use std::path::PathBuf;

use eframe::egui::{self, RichText, TextureHandle, TextureOptions, Ui};

use crate::config::Config;
use crate::images::load_chart_image;

// ---------------------------------------------------------------------------
// Pre-rendered chart panels
// ---------------------------------------------------------------------------

/// One batch chart shown on the dashboard.
struct ChartPanel {
    heading: &'static str,
    caption: &'static str,
    /// Shown when the image can't be read.
    missing: &'static str,
    path: PathBuf,
    /// `None` until the first draw; the error is kept so the file isn't
    /// re-read on every frame.
    texture: Option<Result<TextureHandle, String>>,
}

impl ChartPanel {
    fn show(&mut self, ui: &mut Ui) {
        ui.heading(self.heading);

        let path = &self.path;
        let texture = self.texture.get_or_insert_with(|| {
            load_chart_image(path)
                .map(|img| {
                    log::debug!("Loaded chart image {}", path.display());
                    ui.ctx()
                        .load_texture(path.display().to_string(), img, TextureOptions::LINEAR)
                })
                .map_err(|e| {
                    log::warn!("{e}");
                    e.to_string()
                })
        });

        match texture {
            Ok(tex) => {
                ui.add(egui::Image::new(&*tex).max_width(ui.available_width()).maintain_aspect_ratio(true));
                ui.label(RichText::new(self.caption).italics().weak());
            }
            Err(e) => {
                ui.label(self.missing);
                ui.label(RichText::new(e.as_str()).small().weak());
            }
        }
        ui.add_space(12.0);
    }
}

/// The three batch charts. Each panel fails on its own.
pub struct ChartGallery {
    panels: [ChartPanel; 3],
}

impl ChartGallery {
    pub fn new(config: &Config) -> Self {
        Self {
            panels: [
                ChartPanel {
                    heading: "Publication Trend Over Time",
                    caption: "Research publication trend",
                    missing: "Publication trend image not available.",
                    path: config.publication_trend_path(),
                    texture: None,
                },
                ChartPanel {
                    heading: "Top Journals",
                    caption: "Top journals by publication count",
                    missing: "Top journals image not available.",
                    path: config.top_journals_path(),
                    texture: None,
                },
                ChartPanel {
                    heading: "Distribution of Abstract Lengths",
                    caption: "Distribution of abstract lengths",
                    missing: "Abstract length image not available.",
                    path: config.abstract_length_path(),
                    texture: None,
                },
            ],
        }
    }

    /// Forget loaded textures so the images are read again on next draw.
    pub fn refresh(&mut self) {
        for panel in &mut self.panels {
            panel.texture = None;
        }
    }

    pub fn show(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui: &mut Ui| {
            ui.heading("Visualizations");
            if ui
                .small_button("⟳")
                .on_hover_text("Read the chart images again")
                .clicked()
            {
                self.refresh();
            }
        });
        ui.separator();

        for panel in &mut self.panels {
            panel.show(ui);
        }
    }
}
