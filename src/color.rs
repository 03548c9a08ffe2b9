use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Viridis palette generator
// ---------------------------------------------------------------------------

/// Viridis anchor colours, dark purple to yellow.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Sample viridis at `t` in `[0, 1]`, interpolating in linear RGB.
pub fn viridis(t: f32) -> Srgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (VIRIDIS.len() - 1) as f32;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let local = scaled - i as f32;

    let anchor = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = anchor(VIRIDIS[i]).mix(anchor(VIRIDIS[i + 1]), local);
    Srgb::<f32>::from_linear(mixed).into_format()
}

/// `n` colours evenly spaced along viridis.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    match n {
        0 => Vec::new(),
        1 => vec![viridis(0.0)],
        _ => (0..n).map(|i| viridis(i as f32 / (n - 1) as f32)).collect(),
    }
}

pub fn to_color32(c: Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Color mapping: journal → colour
// ---------------------------------------------------------------------------

/// Colours for the top journals, in chart order, so the dashboard can show
/// the same swatches as the bar chart.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: HashMap<String, Srgb<u8>>,
}

impl ColorMap {
    pub fn for_journals(top: &[(String, usize)]) -> Self {
        let palette = generate_palette(top.len());
        let mapping = top
            .iter()
            .zip(palette)
            .map(|((journal, _), c)| (journal.clone(), c))
            .collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, journal: &str) -> Option<Srgb<u8>> {
        self.mapping.get(journal).copied()
    }
}
