//! Plotters adapters for styled strokes and marker glyphs.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::geometry::dash_segments;
use super::util::to_rgba;
use crate::style::{LineDash, MarkerShape, Rgba};

/// ShapeStyle for line strokes.
pub fn line_style(color: Rgba, width: u32) -> ShapeStyle {
    ShapeStyle {
        color: to_rgba(color),
        filled: false,
        stroke_width: width,
    }
}

/// Filled style for bars, wedges and filled markers.
pub fn fill_style(color: Rgba) -> ShapeStyle {
    to_rgba(color).filled()
}

/// Draw a pixel-space polyline with a dash pattern. Hidden lines draw nothing.
pub fn draw_path<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    points: &[(i32, i32)],
    color: Rgba,
    width: u32,
    dash: LineDash,
) -> Result<()> {
    if dash == LineDash::Hidden || points.len() < 2 {
        return Ok(());
    }
    let style = line_style(color, width);
    for run in dash_segments(points, dash.pattern()) {
        if run.len() < 2 {
            continue;
        }
        area.draw(&PathElement::new(run, style))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Draw one marker of half-size `s` centered on pixel `c`.
pub fn draw_marker<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    c: (i32, i32),
    s: i32,
    color: Rgba,
    marker: MarkerShape,
) -> Result<()> {
    let st = to_rgba(color);
    match marker {
        MarkerShape::Circle => area
            .draw(&(EmptyElement::at(c) + Circle::new((0, 0), s, st.filled())))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?,
        MarkerShape::Point => area
            .draw(&(EmptyElement::at(c) + Circle::new((0, 0), (s / 2).max(1), st.filled())))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?,
        MarkerShape::Square => area
            .draw(&(EmptyElement::at(c) + Rectangle::new([(-s, -s), (s, s)], st.filled())))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?,
        MarkerShape::Plus | MarkerShape::X => {
            let pts = marker.outline(s);
            for stroke in pts.chunks(2) {
                area.draw(&(EmptyElement::at(c) + PathElement::new(stroke.to_vec(), st.stroke_width(2))))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            }
        }
        _ => area
            .draw(&(EmptyElement::at(c) + Polygon::new(marker.outline(s), st.filled())))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?,
    }
    Ok(())
}
