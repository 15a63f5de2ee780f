//! Drawing of a single panel into its grid cell.
//!
//! Axes, tick labels and mesh lines go through plotters' `ChartBuilder`; marks
//! are projected to pixels, clipped in data space and drawn on the figure root
//! so dashes, markers and wedges look identical on every backend.

use anyhow::Result;
use num_format::Locale;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::geometry::{Projection, arrow_head, ascending, shrink_segment, wedge_outline};
use super::legend::draw_legend;
use super::markers::{draw_marker, draw_path, fill_style, line_style};
use super::text::{estimate_text_width_px, truncate_to_width};
use super::util::{format_tick, nice_ticks};
use crate::options::Annotation;
use crate::scene::{
    AUTO_TICKS, ColorBar, Frame, LABEL_FONT_PX, Mark, Panel, TICK_FONT_PX, TITLE_FONT_PX,
    TickSpec,
};
use crate::stats::polar;
use crate::style::LineDash;

const RIGHT_MARGIN: i32 = 12;
const EDGE_MARGIN: i32 = 4;
const COLORBAR_STRIP: u32 = 72;
const TICK_LEN: i32 = 5;

fn grid_style() -> ShapeStyle {
    ShapeStyle {
        color: RGBAColor(0xb0, 0xb0, 0xb0, 1.0),
        filled: false,
        stroke_width: 1,
    }
}

fn text_style(px: u32, h: HPos, v: VPos) -> TextStyle<'static> {
    TextStyle::from((FontFamily::SansSerif, px)).pos(Pos::new(h, v))
}

/// Draw `panel` into `cell`. Pixel-space elements are drawn on `root`, whose
/// origin is the backend origin.
pub fn draw_panel<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    cell: &DrawingArea<DB, Shift>,
    panel: &Panel,
    locale: &Locale,
) -> Result<()> {
    if panel.is_blank() {
        return Ok(());
    }

    let (cell_w, _) = cell.dim_in_pixel();
    let split;
    let (plot_cell, bar_cell) = if panel.colorbar.is_some() && cell_w > COLORBAR_STRIP * 2 {
        split = cell.split_horizontally((cell_w - COLORBAR_STRIP) as i32);
        (&split.0, Some(&split.1))
    } else {
        (cell, None)
    };

    let (w, h) = plot_cell.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let g = panel.gutters;
    let (x_range, y_range) = (panel.x_range(), panel.y_range());

    let (axes, square) = match panel.frame {
        Frame::Cartesian => (true, false),
        Frame::Square { axes, .. } => (axes, true),
    };
    let (label_left, label_bottom) = if axes {
        (g.left as i32, g.bottom as i32)
    } else {
        (0, 0)
    };

    // Equal aspect: shrink the longer side of the plotting rectangle.
    let (mut m_left, mut m_right, mut m_top, mut m_bottom) =
        (EDGE_MARGIN, RIGHT_MARGIN, g.top as i32, EDGE_MARGIN);
    if square {
        let avail_w = (w - m_left - m_right - label_left).max(1);
        let avail_h = (h - m_top - m_bottom - label_bottom).max(1);
        let side = avail_w.min(avail_h);
        let (extra_w, extra_h) = (avail_w - side, avail_h - side);
        m_left += extra_w / 2;
        m_right += extra_w - extra_w / 2;
        m_top += extra_h / 2;
        m_bottom += extra_h - extra_h / 2;
    }

    let mut builder = ChartBuilder::on(plot_cell);
    builder
        .margin_left(m_left)
        .margin_right(m_right)
        .margin_top(m_top)
        .margin_bottom(m_bottom)
        .set_label_area_size(LabelAreaPosition::Left, label_left)
        .set_label_area_size(LabelAreaPosition::Bottom, label_bottom);
    // Plotters only sees ascending ranges; a flipped axis lives in `proj`.
    let (xa, ya) = (ascending(x_range), ascending(y_range));
    let mut chart = builder
        .build_cartesian_2d(xa.0..xa.1, ya.0..ya.1)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let top_left = chart.backend_coord(&(xa.0, ya.1));
    let bottom_right = chart.backend_coord(&(xa.1, ya.0));
    let proj = Projection {
        x: x_range,
        y: y_range,
        left: top_left.0,
        top: top_left.1,
        right: bottom_right.0,
        bottom: bottom_right.1,
    };

    if axes {
        let xticks = flipped_auto_ticks(&panel.xticks, x_range);
        let yticks = flipped_auto_ticks(&panel.yticks, y_range);
        let x_auto = xticks == TickSpec::Auto;
        let y_auto = yticks == TickSpec::Auto;
        let x_fmt = |v: &f64| {
            if x_auto {
                format_tick(*v, locale)
            } else {
                String::new()
            }
        };
        let y_fmt = |v: &f64| {
            if y_auto {
                format_tick(*v, locale)
            } else {
                String::new()
            }
        };

        let mut mesh = chart.configure_mesh();
        mesh.x_labels(if x_auto { AUTO_TICKS } else { 0 })
            .y_labels(if y_auto { AUTO_TICKS } else { 0 })
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .label_style((FontFamily::SansSerif, TICK_FONT_PX))
            .axis_desc_style((FontFamily::SansSerif, LABEL_FONT_PX))
            .max_light_lines(0)
            .bold_line_style(grid_style());
        if !x_auto {
            mesh.set_tick_mark_size(LabelAreaPosition::Bottom, 0);
        }
        if !y_auto {
            mesh.set_tick_mark_size(LabelAreaPosition::Left, 0);
        }
        if let Some(desc) = panel.xlabel.as_deref() {
            mesh.x_desc(desc);
        }
        if let Some(desc) = panel.ylabel.as_deref() {
            mesh.y_desc(desc);
        }
        if !panel.grid || square {
            mesh.disable_mesh();
        } else {
            if !x_auto {
                mesh.disable_x_mesh();
            }
            if !y_auto {
                mesh.disable_y_mesh();
            }
        }
        mesh.draw().map_err(|e| anyhow::anyhow!("{:?}", e))?;

        draw_explicit_ticks(root, &proj, &xticks, &yticks, panel.grid, locale)?;
    }

    for mark in &panel.marks {
        draw_mark(root, &proj, mark)?;
    }

    for annotation in &panel.annotations {
        draw_annotation(root, &proj, annotation)?;
    }

    if let Some(location) = panel.legend {
        let obstacles: Vec<(i32, i32)> = panel
            .legend_obstacles()
            .into_iter()
            .filter(|p| proj.contains(*p))
            .map(|p| proj.map(p))
            .collect();
        draw_legend(root, &proj, &panel.legend_entries, location, &obstacles)?;
    }

    if !panel.title.trim().is_empty() {
        let (_, cell_top) = plot_cell.get_base_pixel();
        let title = truncate_to_width(panel.title.trim(), TITLE_FONT_PX, w.max(1) as u32);
        let half = TITLE_FONT_PX as i32 / 2;
        let y = (proj.top - half - 6).max(cell_top + half);
        root.draw(&Text::new(
            title,
            ((proj.left + proj.right) / 2, y),
            text_style(TITLE_FONT_PX, HPos::Center, VPos::Center),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }

    if let (Some(bar), Some(bar_cell)) = (&panel.colorbar, bar_cell) {
        draw_colorbar(root, bar_cell, &proj, bar, locale)?;
    }
    Ok(())
}

/// Plotters' mesh labels follow its ascending range, so automatic ticks on a
/// flipped axis are placed by hand.
fn flipped_auto_ticks(spec: &TickSpec, range: (f64, f64)) -> TickSpec {
    match spec {
        TickSpec::Auto if range.0 > range.1 => TickSpec::Positions(nice_ticks(range, AUTO_TICKS)),
        other => other.clone(),
    }
}

fn visible_ticks(spec: &TickSpec, range: (f64, f64), locale: &Locale) -> Vec<(f64, String)> {
    let in_range = |v: f64| v >= range.0.min(range.1) - 1e-9 && v <= range.0.max(range.1) + 1e-9;
    match spec {
        TickSpec::Auto => Vec::new(),
        TickSpec::Positions(values) => values
            .iter()
            .filter(|v| in_range(**v))
            .map(|v| (*v, format_tick(*v, locale)))
            .collect(),
        TickSpec::Labeled(ticks) => ticks.iter().filter(|(v, _)| in_range(*v)).cloned().collect(),
    }
}

fn draw_explicit_ticks<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    proj: &Projection,
    xticks: &TickSpec,
    yticks: &TickSpec,
    grid: bool,
    locale: &Locale,
) -> Result<()> {
    let axis = line_style(crate::style::Rgba::rgb(0, 0, 0), 1);

    for (v, label) in visible_ticks(xticks, proj.x, locale) {
        let (px, _) = proj.map((v, proj.y.0));
        if grid {
            root.draw(&PathElement::new(vec![(px, proj.top), (px, proj.bottom)], grid_style()))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
        root.draw(&PathElement::new(
            vec![(px, proj.bottom), (px, proj.bottom + TICK_LEN)],
            axis,
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        root.draw(&Text::new(
            label,
            (px, proj.bottom + TICK_LEN + 3),
            text_style(TICK_FONT_PX, HPos::Center, VPos::Top),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }

    for (v, label) in visible_ticks(yticks, proj.y, locale) {
        let (_, py) = proj.map((proj.x.0, v));
        if grid {
            root.draw(&PathElement::new(vec![(proj.left, py), (proj.right, py)], grid_style()))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
        root.draw(&PathElement::new(
            vec![(proj.left - TICK_LEN, py), (proj.left, py)],
            axis,
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        root.draw(&Text::new(
            label,
            (proj.left - TICK_LEN - 3, py),
            text_style(TICK_FONT_PX, HPos::Right, VPos::Center),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(())
}

fn draw_mark<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    proj: &Projection,
    mark: &Mark,
) -> Result<()> {
    match mark {
        Mark::Polyline {
            points,
            color,
            dash,
            width,
        } => {
            for run in proj.clip_polyline(points) {
                draw_path(root, &run, *color, *width, *dash)?;
            }
        }
        Mark::Markers {
            points,
            color,
            shape,
            size,
        } => {
            for p in points.iter().filter(|p| p.0.is_finite() && p.1.is_finite()) {
                if proj.contains(*p) {
                    draw_marker(root, proj.map(*p), *size, *color, *shape)?;
                }
            }
        }
        Mark::Bars(bars) => {
            for b in bars {
                if let Some(rect) = proj.clip_rect(b.x0, b.x1, b.y0, b.y1) {
                    root.draw(&Rectangle::new(rect, fill_style(b.color)))
                        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                }
            }
        }
        Mark::Cells {
            matrix,
            cmap,
            min,
            max,
        } => {
            let rows = matrix.len();
            for (i, row) in matrix.iter().enumerate() {
                let y = (rows - 1 - i) as f64;
                for (j, v) in row.iter().enumerate() {
                    if !v.is_finite() {
                        continue;
                    }
                    let x = j as f64;
                    if let Some(rect) = proj.clip_rect(x - 0.5, x + 0.5, y - 0.5, y + 0.5) {
                        root.draw(&Rectangle::new(rect, fill_style(cmap.map(*v, *min, *max))))
                            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                    }
                }
            }
        }
        Mark::Wedges(slices) => {
            for s in slices.iter().filter(|s| s.wedge.fraction > 0.0) {
                let outline: Vec<(i32, i32)> = wedge_outline(s.wedge.start_deg, s.wedge.end_deg)
                    .into_iter()
                    .map(|p| proj.map(p))
                    .collect();
                root.draw(&Polygon::new(outline, fill_style(s.color)))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            }
            for s in slices {
                let mid = s.wedge.mid_deg();
                let outer = polar(1.1, mid);
                let h = if outer.0 < 0.0 { HPos::Right } else { HPos::Left };
                root.draw(&Text::new(
                    s.label.clone(),
                    proj.map(outer),
                    text_style(TICK_FONT_PX, h, VPos::Center),
                ))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                root.draw(&Text::new(
                    s.wedge.percent_label(),
                    proj.map(polar(0.6, mid)),
                    text_style(TICK_FONT_PX, HPos::Center, VPos::Center),
                ))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            }
        }
    }
    Ok(())
}

/// Point where the ray from `center` toward `target` leaves a box of
/// half-size `(hw, hh)` around `center`.
fn box_exit(center: (i32, i32), target: (i32, i32), hw: f64, hh: f64) -> (i32, i32) {
    let (dx, dy) = ((target.0 - center.0) as f64, (target.1 - center.1) as f64);
    let tx = if dx.abs() > f64::EPSILON { hw / dx.abs() } else { f64::INFINITY };
    let ty = if dy.abs() > f64::EPSILON { hh / dy.abs() } else { f64::INFINITY };
    let t = tx.min(ty).min(1.0);
    (
        (center.0 as f64 + dx * t).round() as i32,
        (center.1 as f64 + dy * t).round() as i32,
    )
}

fn draw_annotation<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    proj: &Projection,
    a: &Annotation,
) -> Result<()> {
    let text_at = proj.map(a.xytext);
    let anchor = proj.map(a.xy);
    let hw = estimate_text_width_px(&a.text, TICK_FONT_PX) as f64 / 2.0 + 2.0;
    let hh = TICK_FONT_PX as f64 / 2.0 + 2.0;
    let start = box_exit(text_at, anchor, hw, hh);

    if let Some((from, tip)) = shrink_segment(start, anchor, a.arrow.shrink, 2.0) {
        draw_path(root, &[from, tip], a.arrow.color, a.arrow.width, LineDash::Solid)?;
        if a.arrow.head {
            let head = arrow_head(from, tip, 6.0 + 2.0 * a.arrow.width as f64);
            if head.len() == 3 {
                root.draw(&Polygon::new(head, fill_style(a.arrow.color)))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            }
        }
    }
    root.draw(&Text::new(
        a.text.clone(),
        text_at,
        text_style(TICK_FONT_PX, HPos::Center, VPos::Center),
    ))
    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    strip: &DrawingArea<DB, Shift>,
    proj: &Projection,
    bar: &ColorBar,
    locale: &Locale,
) -> Result<()> {
    const BANDS: i32 = 64;
    const BAR_W: i32 = 14;
    let (sx, _) = strip.get_base_pixel();
    let x0 = sx + 8;
    let x1 = x0 + BAR_W;
    let (top, bottom) = (proj.top, proj.bottom);
    let height = (bottom - top).max(1);

    for k in 0..BANDS {
        let y_hi = bottom - height * (k + 1) / BANDS;
        let y_lo = bottom - height * k / BANDS;
        let t = (k as f64 + 0.5) / BANDS as f64;
        root.draw(&Rectangle::new([(x0, y_hi), (x1, y_lo)], fill_style(bar.cmap.sample(t))))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    let border = line_style(crate::style::Rgba::rgb(0, 0, 0), 1);
    root.draw(&Rectangle::new([(x0, top), (x1, bottom)], border))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let steps = 4;
    for k in 0..=steps {
        let t = k as f64 / steps as f64;
        let v = bar.min + (bar.max - bar.min) * t;
        let y = bottom - (height as f64 * t).round() as i32;
        root.draw(&PathElement::new(vec![(x1, y), (x1 + 4, y)], border))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        root.draw(&Text::new(
            format_tick(v, locale),
            (x1 + 6, y),
            text_style(TICK_FONT_PX, HPos::Left, VPos::Center),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_exit_stops_at_the_text_box() {
        assert_eq!(box_exit((0, 0), (100, 0), 10.0, 5.0), (10, 0));
        assert_eq!(box_exit((0, 0), (0, -100), 10.0, 5.0), (0, -5));
        // A target inside the box is returned unchanged.
        assert_eq!(box_exit((0, 0), (3, 1), 10.0, 5.0), (3, 1));
    }

    #[test]
    fn explicit_ticks_outside_the_range_are_dropped() {
        let ticks = TickSpec::Positions(vec![-1.0, 0.0, 2.5, 11.0]);
        let shown = visible_ticks(&ticks, (0.0, 10.0), &Locale::en);
        assert_eq!(shown, vec![(0.0, "0".to_string()), (2.5, "2.5".to_string())]);
        assert!(visible_ticks(&TickSpec::Auto, (0.0, 1.0), &Locale::en).is_empty());
    }

    #[test]
    fn flipped_axes_get_hand_placed_ticks() {
        assert_eq!(flipped_auto_ticks(&TickSpec::Auto, (0.0, 10.0)), TickSpec::Auto);
        let TickSpec::Positions(ticks) = flipped_auto_ticks(&TickSpec::Auto, (10.0, 0.0)) else {
            panic!("expected positions");
        };
        assert_eq!(ticks, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        let fixed = TickSpec::Positions(vec![1.0]);
        assert_eq!(flipped_auto_ticks(&fixed, (10.0, 0.0)), fixed);
    }
}
