//! Plotters backend: draw a [`Figure`] to **SVG**, **PNG** or an RGB buffer.
//!
//! - One drawing area per grid cell, split evenly
//! - Locale-aware tick labels (`30,000` vs `30.000`)
//! - Clipped, dashed polylines and marker glyphs drawn in pixel space
//! - Legends, annotations with arrows, explicit ticks and colour bars

pub mod fonts;
pub mod geometry;
pub mod legend;
pub mod markers;
pub mod panel;
pub mod text;
pub mod util;

use crate::scene::Figure;
use anyhow::{Context, Result, anyhow};
use num_format::Locale;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::{Path, PathBuf};

pub use fonts::ensure_font;
use util::map_locale;

pub const DEFAULT_DPI: f64 = 100.0;

/// Output options shared by the CLI and the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Pixels per inch applied to the figure size.
    pub dpi: f64,
    /// Explicit pixel size; overrides `figsize × dpi`.
    pub size: Option<(u32, u32)>,
    /// Tick label locale tag (`en`, `de`, `fr`, ...).
    pub locale: String,
    /// Font file; falls back to `CHARTGRID_FONT` and system fonts.
    pub font: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            size: None,
            locale: "en".to_string(),
            font: None,
        }
    }
}

impl RenderSettings {
    pub fn pixel_size(&self, figure: &Figure) -> (u32, u32) {
        match self.size {
            Some((w, h)) => (w.max(1), h.max(1)),
            None => figure.pixel_size(self.dpi),
        }
    }
}

/// Write `figure` to `out_path`: SVG when the extension is `svg`, otherwise a
/// bitmap in the format implied by the extension (PNG for `.png`).
pub fn save<P: AsRef<Path>>(figure: &Figure, out_path: P, settings: &RenderSettings) -> Result<()> {
    ensure_font(settings.font.as_deref())?;
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let (width, height) = settings.pixel_size(figure);
    let num_locale = map_locale(&settings.locale);

    let is_svg = out_path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    let drawn = if is_svg {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_figure(&root, figure, num_locale)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_figure(&root, figure, num_locale)
    };
    drawn.with_context(|| format!("cannot write {}", out_path.display()))?;
    log::info!("wrote {} ({width}x{height})", out_path.display());
    Ok(())
}

/// Draw `figure` into a packed RGB buffer. Returns `(width, height, pixels)`.
pub fn rasterize(figure: &Figure, settings: &RenderSettings) -> Result<(u32, u32, Vec<u8>)> {
    ensure_font(settings.font.as_deref())?;
    let (width, height) = settings.pixel_size(figure);
    let num_locale = map_locale(&settings.locale);
    let mut buf = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        draw_figure(&root, figure, num_locale)?;
    }
    Ok((width, height, buf))
}

/// Draw every non-blank panel into its cell of an evenly split `root`.
/// Gutters are re-measured for `locale` first.
pub fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    locale: &Locale,
) -> Result<()> {
    let mut figure = figure.clone();
    figure.tight_layout_for(locale);
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let (rows, cols) = (figure.grid.rows(), figure.grid.columns());
    if rows == 0 || cols == 0 {
        return Err(anyhow!("figure has an empty grid"));
    }
    let cells = root.split_evenly((rows, cols));
    for ((r, c), panel) in figure.grid.iter() {
        if panel.is_blank() {
            continue;
        }
        let Some(cell) = cells.get(r * cols + c) else {
            continue;
        };
        log::debug!("drawing panel ({r}, {c})");
        panel::draw_panel(root, cell, panel, locale)
            .with_context(|| format!("panel at row {r}, column {c}"))?;
    }
    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
