//! Static chart generation for the batch presenter.
//!
//! Three PNGs, each fully overwritten on every run:
//! 1. publication trend: publications per year, line with markers
//! 2. top journals: horizontal bars, viridis colours, largest on top
//! 3. abstract lengths: 50-bin histogram with a density overlay

use std::path::Path;
use std::sync::Once;

use anyhow::{Context, Result};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use ::palette::Srgb;

use crate::color::generate_palette;
use crate::data::aggregate::{density_curve, Histogram, YearCounts};

const TREND_SIZE: (u32, u32) = (1200, 600);
const BARS_SIZE: (u32, u32) = (1000, 600);
const HIST_SIZE: (u32, u32) = (1000, 600);

const LINE_BLUE: RGBColor = RGBColor(31, 119, 180);
const BAR_BLUE: RGBColor = RGBColor(76, 114, 176);
const GRID_GRAY: RGBColor = RGBColor(220, 220, 220);

/// Journal names longer than this are shortened on the bar chart axis.
const MAX_LABEL_CHARS: usize = 45;

/// Density curve resolution.
const DENSITY_POINTS: usize = 200;

/// Every chart label uses this face, registered under the family name the
/// charts ask for.
const FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
const FONT_FAMILY: &str = "sans-serif";

static FONT_INIT: Once = Once::new();

fn ensure_font() {
    FONT_INIT.call_once(|| {
        if register_font(FONT_FAMILY, FontStyle::Normal, FONT).is_err() {
            log::warn!("Embedded chart font could not be parsed; labels will be missing");
        }
    });
}

fn rgb(c: Srgb<u8>) -> RGBColor {
    RGBColor(c.red, c.green, c.blue)
}

fn shorten(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{head}…")
    }
}

// ---------------------------------------------------------------------------
// Publication trend
// ---------------------------------------------------------------------------

/// Line chart of publications per year. Undated records are not plotted.
pub fn render_publication_trend(path: &Path, years: &YearCounts) -> Result<()> {
    ensure_font();
    let points = years.points();
    let first = points.first().map_or(2019, |p| p.0);
    let last = points.last().map_or(2021, |p| p.0);
    let y_max = points.iter().map(|p| p.1).max().unwrap_or(0);

    let root = BitMapBackend::new(path, TREND_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Research Publication Trend Over Time", (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((first - 1)..(last + 1), 0usize..(y_max + y_max / 10 + 1))?;

    chart
        .configure_mesh()
        .light_line_style(GRID_GRAY)
        .x_desc("Year")
        .y_desc("Number of Publications")
        .x_labels(points.len().max(2) + 2)
        .x_label_formatter(&|y| y.to_string())
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), LINE_BLUE.stroke_width(2)))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(year, count)| Circle::new((year, count), 5, LINE_BLUE.filled())),
    )?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Publication trend saved to {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Top journals
// ---------------------------------------------------------------------------

/// Horizontal bar chart of the top journals, largest at the top.
pub fn render_top_journals(path: &Path, top: &[(String, usize)]) -> Result<()> {
    ensure_font();
    let n = top.len() as u32;
    let x_max = top.iter().map(|t| t.1).max().unwrap_or(0) as u32;
    let colors = generate_palette(top.len());

    // Row 0 is drawn at the bottom, so the largest journal takes the last row.
    let row_of = |rank: usize| n - 1 - rank as u32;
    let labels: Vec<String> = top.iter().rev().map(|(j, _)| shorten(j)).collect();

    let root = BitMapBackend::new(path, BARS_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Top Journals by Publication Count", (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(320)
        .build_cartesian_2d(0u32..(x_max + x_max / 10 + 1), (0u32..n.max(1)).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .light_line_style(GRID_GRAY)
        .x_desc("Number of Publications")
        .y_desc("Journal")
        .y_labels(top.len().max(1))
        .y_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(top.iter().enumerate().map(|(rank, (_, count))| {
        let row = row_of(rank);
        let color = colors.get(rank).copied().map_or(BAR_BLUE, rgb);
        let mut bar = Rectangle::new(
            [
                (0, SegmentValue::Exact(row)),
                (*count as u32, SegmentValue::Exact(row + 1)),
            ],
            color.filled(),
        );
        bar.set_margin(4, 4, 0, 0);
        bar
    }))?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Top journals chart saved to {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Abstract length distribution
// ---------------------------------------------------------------------------

/// Histogram of abstract lengths with a scaled density curve on top.
pub fn render_abstract_lengths(path: &Path, lengths: &[usize], bins: usize) -> Result<()> {
    ensure_font();
    let hist = Histogram::from_values(lengths, bins);
    let curve = density_curve(lengths, hist.bin_width(), DENSITY_POINTS);

    let x_min = hist.edges.first().copied().unwrap_or(0.0);
    let x_max = hist.edges.last().copied().unwrap_or(1.0);
    let curve_max = curve.iter().map(|p| p.1).fold(0.0, f64::max);
    let y_max = (hist.max_count() as f64).max(curve_max).max(1.0) * 1.1;

    let root = BitMapBackend::new(path, HIST_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Abstract Lengths", (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .light_line_style(GRID_GRAY)
        .x_desc("Abstract Length")
        .y_desc("Frequency")
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .draw()?;

    chart.draw_series(hist.bars().map(|(left, right, count)| {
        Rectangle::new([(left, 0.0), (right, count as f64)], BAR_BLUE.mix(0.6).filled())
    }))?;
    chart.draw_series(hist.bars().map(|(left, right, count)| {
        Rectangle::new([(left, 0.0), (right, count as f64)], BAR_BLUE.stroke_width(1))
    }))?;

    if !curve.is_empty() {
        chart.draw_series(LineSeries::new(curve, LINE_BLUE.stroke_width(2)))?;
    }

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Abstract length histogram saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::load_chart_image;
    use tempfile::TempDir;

    #[test]
    fn short_labels_untouched() {
        assert_eq!(shorten("The Lancet"), "The Lancet");
    }

    #[test]
    fn long_labels_shortened() {
        let long = "x".repeat(80);
        let short = shorten(&long);
        assert_eq!(short.chars().count(), MAX_LABEL_CHARS);
        assert!(short.ends_with('…'));
    }

    #[test]
    fn renders_all_three_charts() {
        let dir = TempDir::new().unwrap();
        let years = YearCounts {
            by_year: [(2019, 3), (2020, 40), (2021, 12)].into_iter().collect(),
            unknown: 2,
        };
        let top = vec![("The Lancet".to_string(), 9), ("BMJ".to_string(), 4)];
        let lengths: Vec<usize> = (0..200).map(|i| 100 + (i * 37) % 900).collect();

        let trend = dir.path().join("trend.png");
        let bars = dir.path().join("bars.png");
        let hist = dir.path().join("hist.png");
        render_publication_trend(&trend, &years).unwrap();
        render_top_journals(&bars, &top).unwrap();
        render_abstract_lengths(&hist, &lengths, 50).unwrap();

        assert_eq!(load_chart_image(&trend).unwrap().size, [TREND_SIZE.0 as usize, TREND_SIZE.1 as usize]);
        assert_eq!(load_chart_image(&bars).unwrap().size, [BARS_SIZE.0 as usize, BARS_SIZE.1 as usize]);
        assert_eq!(load_chart_image(&hist).unwrap().size, [HIST_SIZE.0 as usize, HIST_SIZE.1 as usize]);
    }

    #[test]
    fn empty_inputs_still_render() {
        let dir = TempDir::new().unwrap();
        let trend = dir.path().join("trend.png");
        let bars = dir.path().join("bars.png");
        let hist = dir.path().join("hist.png");

        render_publication_trend(&trend, &YearCounts::default()).unwrap();
        render_top_journals(&bars, &[]).unwrap();
        render_abstract_lengths(&hist, &[], 50).unwrap();

        for path in [trend, bars, hist] {
            assert!(load_chart_image(&path).is_ok(), "{} unreadable", path.display());
        }
    }

    #[test]
    fn single_value_histogram_renders() {
        let dir = TempDir::new().unwrap();
        let hist = dir.path().join("hist.png");
        render_abstract_lengths(&hist, &[20, 20, 20], 50).unwrap();
        assert!(load_chart_image(&hist).is_ok());
    }
}
