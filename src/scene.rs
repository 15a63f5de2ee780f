//! Retained drawing surface.
//!
//! Renderers write marks in data coordinates into a [`Panel`]; the backend in
//! [`crate::viz`] turns a finished [`Figure`] into pixels. Nothing here knows
//! about plotters.

use crate::models::ChartKind;
use crate::options::{Annotation, LegendLocation};
use crate::stats::{extent, with_margin, Wedge};
use crate::style::{Colormap, LineDash, MarkerShape, Rgba};
use crate::viz::text::estimate_text_width_px;
use crate::viz::util::{compute_left_label_area_px, format_tick};
use num_format::Locale;

/// Number of automatic tick labels requested per axis.
pub const AUTO_TICKS: usize = 6;
pub const TICK_FONT_PX: u32 = 12;
pub const LABEL_FONT_PX: u32 = 14;
pub const TITLE_FONT_PX: u32 = 16;
/// Relative padding added around auto-scaled data ranges.
pub const AXIS_MARGIN: f64 = 0.05;

/// Half extent of the square data area used by pie charts.
pub const PIE_EXTENT: f64 = 1.25;
/// Half extent of the square data area used by Smith charts.
pub const SMITH_EXTENT: f64 = 1.1;

/// How a panel's plotting area is framed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    /// Auto-scaled axes with a mesh.
    Cartesian,
    /// Fixed `[-extent, extent]²` square with equal aspect; `axes` draws the
    /// axis lines and tick labels.
    Square { extent: f64, axes: bool },
}

/// Tick placement along one axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TickSpec {
    #[default]
    Auto,
    /// Ticks at these positions, labelled with the formatted values.
    Positions(Vec<f64>),
    /// Ticks at these positions with fixed text (categories, heatmap labels).
    Labeled(Vec<(f64, String)>),
}

/// One filled rectangle in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub color: Rgba,
}

/// A pie wedge together with its text.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub wedge: Wedge,
    pub color: Rgba,
    pub label: String,
}

/// Drawable primitive, in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Polyline {
        points: Vec<(f64, f64)>,
        color: Rgba,
        dash: LineDash,
        width: u32,
    },
    Markers {
        points: Vec<(f64, f64)>,
        color: Rgba,
        shape: MarkerShape,
        size: i32,
    },
    Bars(Vec<BarRect>),
    /// Row 0 of `matrix` is drawn at the top; cell `(i, j)` is centered on
    /// `(j, rows - 1 - i)`.
    Cells {
        matrix: Vec<Vec<f64>>,
        cmap: Colormap,
        min: f64,
        max: f64,
    },
    /// Unit-radius pie centered on the origin.
    Wedges(Vec<Slice>),
}

impl Mark {
    /// Points that count as "data" when auto-scaling and placing legends.
    pub fn extent_points(&self) -> Vec<(f64, f64)> {
        match self {
            Mark::Polyline { points, .. } | Mark::Markers { points, .. } => points.clone(),
            Mark::Bars(bars) => bars
                .iter()
                .flat_map(|b| [(b.x0, b.y0), (b.x1, b.y1)])
                .collect(),
            Mark::Cells { matrix, .. } => {
                let rows = matrix.len() as f64;
                let cols = matrix.first().map_or(0, Vec::len) as f64;
                vec![(-0.5, -0.5), (cols - 0.5, rows - 0.5)]
            }
            Mark::Wedges(_) => vec![(-1.0, -1.0), (1.0, 1.0)],
        }
    }
}

/// Glyph drawn next to a legend label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Swatch {
    Line {
        dash: LineDash,
        marker: Option<MarkerShape>,
    },
    Marker(MarkerShape),
    Patch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgba,
    pub swatch: Swatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorBar {
    pub cmap: Colormap,
    pub min: f64,
    pub max: f64,
}

/// Pixel space reserved around the plotting area, filled in by
/// [`Figure::tight_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gutters {
    pub left: u32,
    pub bottom: u32,
    pub top: u32,
}

/// One cell of the figure grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// `None` for cells no chart was placed in.
    pub kind: Option<ChartKind>,
    pub frame: Frame,
    pub marks: Vec<Mark>,
    pub title: String,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub legend_entries: Vec<LegendEntry>,
    /// Legend is drawn only when set.
    pub legend: Option<LegendLocation>,
    pub annotations: Vec<Annotation>,
    pub grid: bool,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub xticks: TickSpec,
    pub yticks: TickSpec,
    /// Bars and histograms keep zero on the value axis.
    pub sticky_zero: bool,
    pub colorbar: Option<ColorBar>,
    pub gutters: Gutters,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            kind: None,
            frame: Frame::Cartesian,
            marks: Vec::new(),
            title: String::new(),
            xlabel: None,
            ylabel: None,
            legend_entries: Vec::new(),
            legend: None,
            annotations: Vec::new(),
            grid: false,
            xlim: None,
            ylim: None,
            xticks: TickSpec::Auto,
            yticks: TickSpec::Auto,
            sticky_zero: false,
            colorbar: None,
            gutters: Gutters::default(),
        }
    }
}

impl Panel {
    pub fn is_blank(&self) -> bool {
        self.kind.is_none()
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    fn data_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.marks.iter().flat_map(Mark::extent_points)
    }

    /// Heatmap cells are drawn edge to edge without padding.
    fn is_image(&self) -> bool {
        self.marks.iter().any(|m| matches!(m, Mark::Cells { .. }))
    }

    /// Visible x range: `xlim`, else the data range plus margins.
    pub fn x_range(&self) -> (f64, f64) {
        if let Some(lim) = self.xlim {
            return nonzero(lim);
        }
        if let Frame::Square { extent, .. } = self.frame {
            return (-extent, extent);
        }
        match extent(self.data_points().map(|p| p.0)) {
            Some(r) if self.is_image() => nonzero(r),
            Some(r) => with_margin(r, AXIS_MARGIN),
            None => (0.0, 1.0),
        }
    }

    /// Visible y range: `ylim`, else the data range plus margins (anchored at
    /// zero for bars and histograms).
    pub fn y_range(&self) -> (f64, f64) {
        if let Some(lim) = self.ylim {
            return nonzero(lim);
        }
        if let Frame::Square { extent, .. } = self.frame {
            return (-extent, extent);
        }
        let Some((lo, hi)) = extent(self.data_points().map(|p| p.1)) else {
            return (0.0, 1.0);
        };
        if self.is_image() {
            return nonzero((lo, hi));
        }
        if self.sticky_zero {
            let (lo, hi) = (lo.min(0.0), hi.max(0.0));
            let (mlo, mhi) = with_margin((lo, hi), AXIS_MARGIN);
            return (if lo >= 0.0 { 0.0 } else { mlo }, if hi <= 0.0 { 0.0 } else { mhi });
        }
        with_margin((lo, hi), AXIS_MARGIN)
    }

    /// All data points, used to choose the emptiest legend corner.
    pub fn legend_obstacles(&self) -> Vec<(f64, f64)> {
        self.data_points().collect()
    }

    fn measure_gutters(&self, locale: &Locale) -> Gutters {
        if self.is_blank() {
            return Gutters::default();
        }
        let top = if self.title.trim().is_empty() {
            8
        } else {
            TITLE_FONT_PX + 14
        };
        let (axes, explicit_y) = match self.frame {
            Frame::Square { axes, .. } => (axes, None),
            Frame::Cartesian => (true, Some(&self.yticks)),
        };
        if !axes {
            return Gutters { left: 8, bottom: 8, top };
        }
        let desc = |label: &Option<String>| match label {
            Some(s) if !s.trim().is_empty() => LABEL_FONT_PX + 8,
            _ => 0,
        };
        let widest = |labels: Vec<String>| {
            labels
                .iter()
                .map(|l| estimate_text_width_px(l, TICK_FONT_PX))
                .max()
                .unwrap_or(0)
                + 18
        };
        let tick_w = match explicit_y {
            Some(TickSpec::Labeled(ticks)) => widest(ticks.iter().map(|(_, l)| l.clone()).collect()),
            Some(TickSpec::Positions(ticks)) => {
                widest(ticks.iter().map(|v| format_tick(*v, locale)).collect())
            }
            _ => {
                let (lo, hi) = self.y_range();
                compute_left_label_area_px(lo, hi, AUTO_TICKS, TICK_FONT_PX, locale)
            }
        };
        Gutters {
            left: tick_w + desc(&self.ylabel),
            bottom: TICK_FONT_PX + 16 + desc(&self.xlabel),
            top,
        }
    }
}

fn nonzero((lo, hi): (f64, f64)) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

/// Rows × columns of panels; always two-dimensional, even for a 1×1 layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Vec<Vec<Panel>>,
}

impl Grid {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            cells: vec![vec![Panel::default(); columns]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Panel> {
        self.cells.get(row)?.get(col)
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Panel> {
        self.cells.get_mut(row)?.get_mut(col)
    }

    /// Row-major iteration with cell coordinates.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &Panel)> {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().map(move |(c, panel)| ((r, c), panel))
        })
    }

    pub fn as_rows(&self) -> &[Vec<Panel>] {
        &self.cells
    }
}

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub grid: Grid,
    /// Width and height in inches.
    pub figsize: (f64, f64),
}

impl Figure {
    /// Pixel size of the figure at `dpi`.
    pub fn pixel_size(&self, dpi: f64) -> (u32, u32) {
        let px = |inches: f64| ((inches * dpi).round() as u32).max(1);
        (px(self.figsize.0), px(self.figsize.1))
    }

    /// Global layout pass with English tick labels, see
    /// [`Figure::tight_layout_for`].
    pub fn tight_layout(&mut self) {
        self.tight_layout_for(&Locale::en);
    }

    /// Global layout pass: measure every panel's gutters with tick labels
    /// formatted for `locale`, then align them so that panels in one row share
    /// top/bottom gutters and panels in one column share the left gutter.
    pub fn tight_layout_for(&mut self, locale: &Locale) {
        let rows = self.grid.rows();
        let cols = self.grid.columns();
        let measured: Vec<Vec<Gutters>> = self
            .grid
            .cells
            .iter()
            .map(|row| row.iter().map(|p| p.measure_gutters(locale)).collect())
            .collect();

        let row_top: Vec<u32> = (0..rows)
            .map(|r| measured[r].iter().map(|g| g.top).max().unwrap_or(0))
            .collect();
        let row_bottom: Vec<u32> = (0..rows)
            .map(|r| measured[r].iter().map(|g| g.bottom).max().unwrap_or(0))
            .collect();
        let col_left: Vec<u32> = (0..cols)
            .map(|c| measured.iter().map(|row| row[c].left).max().unwrap_or(0))
            .collect();

        for (r, row) in self.grid.cells.iter_mut().enumerate() {
            for (c, panel) in row.iter_mut().enumerate() {
                if panel.is_blank() {
                    continue;
                }
                panel.gutters = Gutters {
                    left: col_left[c],
                    bottom: row_bottom[r],
                    top: row_top[r],
                };
            }
        }
        log::debug!("tight layout: left {col_left:?}, top {row_top:?}, bottom {row_bottom:?}");
    }
}
