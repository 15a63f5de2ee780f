//! Legend box drawn inside a panel's plotting rectangle.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::geometry::{Projection, best_location, legend_origin};
use super::markers::{draw_marker, draw_path, fill_style};
use super::text::{estimate_text_width_px, truncate_to_width};
use crate::options::LegendLocation;
use crate::scene::{LegendEntry, Swatch};
use crate::style::{LineDash, Rgba};

// Layout constants (shared by `legend_size` and `draw_legend`)
const FONT_PX: u32 = 12;
const LINE_H: i32 = FONT_PX as i32 + 4;
const PAD: i32 = 6;
const SAMPLE_W: i32 = 20;
const SAMPLE_TO_TEXT_GAP: i32 = 6;
const MARKER_RADIUS: i32 = 3;

/// Pixel size of the legend box for `entries`, with labels capped at `max_text_px`.
pub fn legend_size(entries: &[LegendEntry], max_text_px: u32) -> (i32, i32) {
    let text_w = entries
        .iter()
        .map(|e| estimate_text_width_px(&e.label, FONT_PX).min(max_text_px))
        .max()
        .unwrap_or(0) as i32;
    (
        PAD + SAMPLE_W + SAMPLE_TO_TEXT_GAP + text_w + PAD,
        PAD * 2 + LINE_H * entries.len() as i32,
    )
}

/// Draw the legend at `location` (resolving `best` against `obstacles`, the
/// panel's data points in pixels). Nothing is drawn without entries.
pub fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    proj: &Projection,
    entries: &[LegendEntry],
    location: LegendLocation,
    obstacles: &[(i32, i32)],
) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let max_text_px = (proj.width() / 2).max(40) as u32;
    let (w, h) = legend_size(entries, max_text_px);
    let location = match location {
        LegendLocation::Best => best_location(proj, w, h, obstacles),
        other => other,
    };
    let (x, y) = legend_origin(proj, location, w, h);

    area.draw(&Rectangle::new([(x, y), (x + w, y + h)], WHITE.mix(0.85).filled()))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    area.draw(&Rectangle::new(
        [(x, y), (x + w, y + h)],
        ShapeStyle {
            color: BLACK.mix(0.3),
            filled: false,
            stroke_width: 1,
        },
    ))
    .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let label_style: TextStyle =
        TextStyle::from((FontFamily::SansSerif, FONT_PX)).pos(Pos::new(HPos::Left, VPos::Center));
    let text_x = x + PAD + SAMPLE_W + SAMPLE_TO_TEXT_GAP;

    for (i, entry) in entries.iter().enumerate() {
        let cy = y + PAD + i as i32 * LINE_H + LINE_H / 2;
        draw_swatch(area, x + PAD, cy, entry.color, entry.swatch)?;
        let label = truncate_to_width(&entry.label, FONT_PX, max_text_px);
        area.draw(&Text::new(label, (text_x, cy), label_style.clone()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Line sample, marker or color patch starting at `x`, vertically centered on `y`.
fn draw_swatch<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    x: i32,
    y: i32,
    color: Rgba,
    swatch: Swatch,
) -> Result<()> {
    let mid = x + SAMPLE_W / 2;
    match swatch {
        Swatch::Line { dash, marker } => {
            // Hidden lines still show their marker.
            if dash != LineDash::Hidden {
                draw_path(area, &[(x, y), (x + SAMPLE_W, y)], color, 2, dash)?;
            }
            if let Some(shape) = marker {
                draw_marker(area, (mid, y), MARKER_RADIUS, color, shape)?;
            }
        }
        Swatch::Marker(shape) => draw_marker(area, (mid, y), MARKER_RADIUS, color, shape)?,
        Swatch::Patch => {
            let half = (LINE_H / 2 - 3).max(3);
            area.draw(&Rectangle::new(
                [(x + 2, y - half), (x + SAMPLE_W - 2, y + half)],
                fill_style(color),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
    }
    Ok(())
}
