//! Per-type renderers. Each one writes marks, ticks and legend entries into a
//! panel; titles, labels and limits come from the overlay afterwards.

use crate::models::{LineEntry, XY};
use crate::options::{BarColors, LineStyle};
use crate::scene::{
    BarRect, ColorBar, Frame, LegendEntry, Mark, Panel, Slice, Swatch, TickSpec, PIE_EXTENT,
    SMITH_EXTENT,
};
use crate::stats::{extent, histogram, pie_wedges};
use crate::style::{palette_color, Colormap, LineDash, MarkerShape, Rgba};
use crate::smith;

pub const LINE_WIDTH: u32 = 2;
pub const MARKER_SIZE: i32 = 4;
pub const BAR_WIDTH: f64 = 0.8;
/// Pie wedges start at twelve o'clock and run counter-clockwise.
pub const PIE_START_DEG: f64 = 90.0;

const SMITH_GRID_COLOR: Rgba = Rgba {
    r: 0xb0,
    g: 0xb0,
    b: 0xb0,
    a: 255,
};

fn category_ticks(xy: &XY) -> Option<TickSpec> {
    xy.x.categories().map(|cats| {
        TickSpec::Labeled(
            cats.iter()
                .enumerate()
                .map(|(i, c)| (i as f64, c.clone()))
                .collect(),
        )
    })
}

fn series(panel: &mut Panel, points: Vec<(f64, f64)>, style: &LineStyle, label: Option<&str>) {
    if style.dash != LineDash::Hidden {
        panel.push(Mark::Polyline {
            points: points.clone(),
            color: style.color,
            dash: style.dash,
            width: LINE_WIDTH,
        });
    }
    if let Some(shape) = style.marker {
        panel.push(Mark::Markers {
            points,
            color: style.color,
            shape,
            size: MARKER_SIZE,
        });
    }
    if let Some(label) = label {
        panel.legend_entries.push(LegendEntry {
            label: label.to_string(),
            color: style.color,
            swatch: Swatch::Line {
                dash: style.dash,
                marker: style.marker,
            },
        });
    }
}

pub fn line(panel: &mut Panel, xy: &XY, style: &LineStyle, label: Option<&str>) {
    series(panel, xy.points(), style, label);
    if let Some(ticks) = category_ticks(xy) {
        panel.xticks = ticks;
    }
}

pub fn multi_line(panel: &mut Panel, lines: &[LineEntry], styles: &[LineStyle]) {
    for (line, style) in lines.iter().zip(styles) {
        series(panel, line.xy.points(), style, line.label.as_deref());
        if let Some(ticks) = category_ticks(&line.xy) {
            panel.xticks = ticks;
        }
    }
}

pub fn bar(panel: &mut Panel, xy: &XY, colors: &BarColors) {
    let half = BAR_WIDTH / 2.0;
    let bars = xy
        .points()
        .into_iter()
        .enumerate()
        .map(|(i, (x, y))| BarRect {
            x0: x - half,
            x1: x + half,
            y0: 0.0,
            y1: y,
            color: colors.for_bar(i),
        })
        .collect();
    panel.push(Mark::Bars(bars));
    panel.sticky_zero = true;
    if let Some(ticks) = category_ticks(xy) {
        panel.xticks = ticks;
    }
}

pub fn scatter(panel: &mut Panel, xy: &XY, color: Rgba, shape: MarkerShape) {
    panel.push(Mark::Markers {
        points: xy.points(),
        color,
        shape,
        size: MARKER_SIZE,
    });
    if let Some(ticks) = category_ticks(xy) {
        panel.xticks = ticks;
    }
}

pub fn smith(
    panel: &mut Panel,
    real: &[f64],
    imag: &[f64],
    color: Rgba,
    marker: Option<MarkerShape>,
    label: Option<&str>,
) {
    panel.frame = Frame::Square {
        extent: SMITH_EXTENT,
        axes: true,
    };
    for (i, points) in smith::grid_lines().into_iter().enumerate() {
        panel.push(Mark::Polyline {
            points,
            // The outer circle is drawn darker than the inner grid.
            color: if i == 0 { Rgba::rgb(0, 0, 0) } else { SMITH_GRID_COLOR },
            dash: LineDash::Solid,
            width: 1,
        });
    }
    let trace: Vec<(f64, f64)> = smith::reflection_trace(real, imag)
        .iter()
        .map(|s| (s.gamma.re, s.gamma.im))
        .collect();
    let style = LineStyle {
        color,
        dash: LineDash::Solid,
        marker,
    };
    series(panel, trace, &style, label);
}

pub fn hist(panel: &mut Panel, values: &[f64], bins: usize, color: Rgba) {
    let bars = histogram(values, bins)
        .into_iter()
        .map(|b| BarRect {
            x0: b.lo,
            x1: b.hi,
            y0: 0.0,
            y1: b.count as f64,
            color,
        })
        .collect();
    panel.push(Mark::Bars(bars));
    panel.sticky_zero = true;
}

pub fn heatmap(
    panel: &mut Panel,
    matrix: &[Vec<f64>],
    x_labels: Option<&[String]>,
    y_labels: Option<&[String]>,
    cmap: &Colormap,
    colorbar: bool,
) {
    let rows = matrix.len();
    let (min, max) = extent(matrix.iter().flatten().copied()).unwrap_or((0.0, 1.0));

    panel.push(Mark::Cells {
        matrix: matrix.to_vec(),
        cmap: cmap.clone(),
        min,
        max,
    });
    if colorbar {
        panel.colorbar = Some(ColorBar {
            cmap: cmap.clone(),
            min,
            max,
        });
    }

    // Rows are drawn top-down, so row i sits at y = rows - 1 - i.
    panel.xticks = cell_ticks(x_labels, |j| j as f64);
    panel.yticks = cell_ticks(y_labels, |i| (rows - 1 - i) as f64);
}

/// One labeled tick per cell; an absent label list leaves the axis bare.
fn cell_ticks(labels: Option<&[String]>, at: impl Fn(usize) -> f64) -> TickSpec {
    TickSpec::Labeled(
        labels
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, l)| (at(i), l.clone()))
            .collect(),
    )
}

pub fn pie(panel: &mut Panel, labels: &[String], sizes: &[f64], colors: Option<&[Rgba]>) {
    panel.frame = Frame::Square {
        extent: PIE_EXTENT,
        axes: false,
    };
    let color_for = |i: usize| match colors {
        Some(list) if !list.is_empty() => list[i % list.len()],
        _ => palette_color(i),
    };
    let slices: Vec<Slice> = pie_wedges(sizes, PIE_START_DEG)
        .into_iter()
        .zip(labels)
        .enumerate()
        .map(|(i, (wedge, label))| Slice {
            wedge,
            color: color_for(i),
            label: label.clone(),
        })
        .collect();
    panel.legend_entries = slices
        .iter()
        .map(|s| LegendEntry {
            label: s.label.clone(),
            color: s.color,
            swatch: Swatch::Patch,
        })
        .collect();
    panel.push(Mark::Wedges(slices));
}
