//! Option normalization.
//!
//! Each chart's raw `options` object is resolved exactly once, right before
//! the chart is drawn, into a fully populated [`ResolvedChart`]: every default
//! is filled in here so renderers never branch on absence. The resolved style
//! borrows the chart's data, so a style can only ever travel with data of its
//! own kind.
//!
//! Some fields are read without a fallback and must be present:
//!
//! | field | required for |
//! |---|---|
//! | `options` | every chart |
//! | `options.style` | line, bar, scatter, hist, heatmap, pie |
//! | `options.legend` | line, smith (smith also needs `legend.show`) |
//! | `options.title` | heatmap, pie |
//! | `lines[j].style` | multi_line |
//! | `text`, `xy`, `xytext`, `arrowprops` | every annotation |

use crate::error::RenderError;
use crate::models::{ChartData, ChartKind, ChartSpec, LineEntry, XY};
use crate::style::{Colormap, LineDash, MarkerShape, Rgba};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Default series color for charts whose style omits `color`.
pub const DEFAULT_COLOR: Rgba = Rgba {
    r: 0,
    g: 0,
    b: 255,
    a: 255,
};
pub const DEFAULT_BINS: usize = 10;
pub const DEFAULT_CMAP: &str = "viridis";
/// Legend label of the Smith chart trace (port 1 reflection).
pub const SMITH_TRACE_LABEL: &str = "S11";

/// Legend placement tokens, as matplotlib spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendLocation {
    /// Resolved by the backend to the corner with the fewest data points.
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    Right,
    CenterLeft,
    CenterRight,
    LowerCenter,
    UpperCenter,
    Center,
}

impl LegendLocation {
    const TOKENS: [(&'static str, LegendLocation); 11] = [
        ("best", LegendLocation::Best),
        ("upper right", LegendLocation::UpperRight),
        ("upper left", LegendLocation::UpperLeft),
        ("lower left", LegendLocation::LowerLeft),
        ("lower right", LegendLocation::LowerRight),
        ("right", LegendLocation::Right),
        ("center left", LegendLocation::CenterLeft),
        ("center right", LegendLocation::CenterRight),
        ("lower center", LegendLocation::LowerCenter),
        ("upper center", LegendLocation::UpperCenter),
        ("center", LegendLocation::Center),
    ];

    /// Numeric location codes `0..=10` map onto the tokens in order.
    pub fn from_code(code: u64) -> Option<Self> {
        Self::TOKENS.get(code as usize).map(|(_, loc)| *loc)
    }
}

impl FromStr for LegendLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::TOKENS
            .iter()
            .find(|(token, _)| *token == wanted)
            .map(|(_, loc)| *loc)
            .ok_or_else(|| format!("unknown legend location '{s}'"))
    }
}

/// Stroke of a polyline series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Rgba,
    pub dash: LineDash,
    pub marker: Option<MarkerShape>,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            dash: LineDash::Solid,
            marker: None,
        }
    }
}

/// One color for every bar, or a list cycled over the bars.
#[derive(Debug, Clone, PartialEq)]
pub enum BarColors {
    Uniform(Rgba),
    Cycle(Vec<Rgba>),
}

impl BarColors {
    pub fn for_bar(&self, i: usize) -> Rgba {
        match self {
            BarColors::Uniform(c) => *c,
            BarColors::Cycle(list) if !list.is_empty() => list[i % list.len()],
            BarColors::Cycle(_) => DEFAULT_COLOR,
        }
    }
}

/// A chart's data paired with its type-specific style, every default applied.
#[derive(Debug, Clone, PartialEq)]
pub enum StyledChart<'a> {
    Line {
        xy: &'a XY,
        style: LineStyle,
    },
    MultiLine {
        lines: &'a [LineEntry],
        /// One entry per line, in data order.
        styles: Vec<LineStyle>,
    },
    Bar {
        xy: &'a XY,
        colors: BarColors,
    },
    Scatter {
        xy: &'a XY,
        color: Rgba,
        marker: MarkerShape,
    },
    Smith {
        real: &'a [f64],
        imag: &'a [f64],
        color: Rgba,
        marker: Option<MarkerShape>,
    },
    Hist {
        values: &'a [f64],
        bins: usize,
        color: Rgba,
    },
    Heatmap {
        matrix: &'a [Vec<f64>],
        x_labels: Option<&'a [String]>,
        y_labels: Option<&'a [String]>,
        cmap: Colormap,
        colorbar: bool,
    },
    Pie {
        labels: &'a [String],
        sizes: &'a [f64],
        /// `None` uses the default color cycle.
        colors: Option<Vec<Rgba>>,
    },
}

impl StyledChart<'_> {
    pub fn kind(&self) -> ChartKind {
        match self {
            StyledChart::Line { .. } => ChartKind::Line,
            StyledChart::MultiLine { .. } => ChartKind::MultiLine,
            StyledChart::Bar { .. } => ChartKind::Bar,
            StyledChart::Scatter { .. } => ChartKind::Scatter,
            StyledChart::Smith { .. } => ChartKind::Smith,
            StyledChart::Hist { .. } => ChartKind::Hist,
            StyledChart::Heatmap { .. } => ChartKind::Heatmap,
            StyledChart::Pie { .. } => ChartKind::Pie,
        }
    }
}

/// Arrow drawn from an annotation's text to its anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub color: Rgba,
    pub width: u32,
    /// `false` for `arrowstyle: "-"` (plain connector).
    pub head: bool,
    /// Fraction of the length trimmed from both ends.
    pub shrink: f64,
    /// The descriptor exactly as configured.
    pub props: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    /// Anchor point the arrow points at (data coordinates).
    pub xy: (f64, f64),
    /// Where the text is placed (data coordinates).
    pub xytext: (f64, f64),
    pub arrow: Arrow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    /// Series label for single-series charts (`line`).
    pub label: Option<String>,
    pub location: LegendLocation,
}

/// Chart-type-agnostic presentation settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    pub title: String,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub annotations: Vec<Annotation>,
    /// `Some` only when `legend.show` is true.
    pub legend: Option<Legend>,
    pub grid: bool,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub xticks: Option<Vec<f64>>,
    pub yticks: Option<Vec<f64>>,
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChart<'a> {
    pub chart: StyledChart<'a>,
    /// Label of the `line` series (from `legend.label`).
    pub series_label: Option<String>,
    pub overlay: Overlay,
}

impl ResolvedChart<'_> {
    pub fn kind(&self) -> ChartKind {
        self.chart.kind()
    }
}

/// Normalize the options of the chart at `index`.
pub fn resolve(index: usize, spec: &ChartSpec) -> Result<ResolvedChart<'_>, RenderError> {
    let kind = spec.kind();
    let r = Reader { index, kind };

    let options = match &spec.options {
        None => return Err(r.missing("options")),
        Some(v) => r.object(v, "options")?,
    };

    let chart = resolve_style(&r, &spec.data, options)?;

    // Line charts read `legend` unconditionally for the series label; the
    // Smith renderer reads `legend.show` unconditionally.
    let legend_raw = match options.get("legend") {
        None if matches!(kind, ChartKind::Line | ChartKind::Smith) => {
            return Err(r.missing("legend"));
        }
        None => None,
        Some(v) => Some(r.object(v, "legend")?),
    };
    if kind == ChartKind::Smith
        && legend_raw.is_some_and(|legend| !legend.contains_key("show"))
    {
        return Err(r.missing("legend.show"));
    }
    let series_label = match legend_raw {
        Some(legend) => r.text(legend, "label", "legend.label")?,
        None => None,
    };
    let series_label = match kind {
        ChartKind::Smith => Some(SMITH_TRACE_LABEL.to_string()),
        _ => series_label,
    };

    let overlay = resolve_overlay(&r, options, legend_raw)?;
    Ok(ResolvedChart {
        chart,
        series_label,
        overlay,
    })
}

struct Reader {
    index: usize,
    kind: ChartKind,
}

impl Reader {
    fn missing(&self, field: &str) -> RenderError {
        RenderError::MissingOption {
            index: self.index,
            kind: self.kind,
            field: field.to_string(),
        }
    }

    fn invalid(&self, field: &str, reason: impl Into<String>) -> RenderError {
        RenderError::InvalidOption {
            index: self.index,
            kind: self.kind,
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    fn object<'v>(&self, v: &'v Value, field: &str) -> Result<&'v Map<String, Value>, RenderError> {
        v.as_object()
            .ok_or_else(|| self.invalid(field, "must be an object"))
    }

    fn required<'v>(
        &self,
        map: &'v Map<String, Value>,
        key: &str,
        field: &str,
    ) -> Result<&'v Value, RenderError> {
        map.get(key).ok_or_else(|| self.missing(field))
    }

    /// Optional text; numbers are accepted and printed as written.
    fn text(
        &self,
        map: &Map<String, Value>,
        key: &str,
        field: &str,
    ) -> Result<Option<String>, RenderError> {
        match map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => self.text_value(v, field).map(Some),
        }
    }

    fn text_value(&self, v: &Value, field: &str) -> Result<String, RenderError> {
        match v {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(self.invalid(field, "must be text")),
        }
    }

    fn flag(&self, map: &Map<String, Value>, key: &str, field: &str) -> Result<Option<bool>, RenderError> {
        match map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.invalid(field, "must be true or false")),
        }
    }

    fn color_value(&self, v: &Value, field: &str) -> Result<Rgba, RenderError> {
        let name = v
            .as_str()
            .ok_or_else(|| self.invalid(field, "must be a color name"))?;
        Rgba::parse(name).ok_or_else(|| self.invalid(field, format!("unknown color '{name}'")))
    }

    fn color(
        &self,
        map: &Map<String, Value>,
        key: &str,
        field: &str,
        default: Rgba,
    ) -> Result<Rgba, RenderError> {
        match map.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(v) => self.color_value(v, field),
        }
    }

    fn color_list(&self, items: &[Value], field: &str) -> Result<Vec<Rgba>, RenderError> {
        items.iter().map(|v| self.color_value(v, field)).collect()
    }

    fn dash(&self, map: &Map<String, Value>, field: &str) -> Result<LineDash, RenderError> {
        match map.get("linestyle").or_else(|| map.get("ls")) {
            None | Some(Value::Null) => Ok(LineDash::Solid),
            Some(Value::String(s)) => s.parse().map_err(|e: String| self.invalid(field, e)),
            Some(_) => Err(self.invalid(field, "must be a linestyle string")),
        }
    }

    fn marker(
        &self,
        map: &Map<String, Value>,
        field: &str,
    ) -> Result<Option<Option<MarkerShape>>, RenderError> {
        match map.get("marker") {
            None => Ok(None),
            Some(Value::Null) => Ok(Some(None)),
            Some(Value::String(s)) => MarkerShape::parse(s)
                .map(Some)
                .map_err(|e| self.invalid(field, e)),
            Some(_) => Err(self.invalid(field, "must be a marker code")),
        }
    }

    fn point(&self, v: &Value, field: &str) -> Result<(f64, f64), RenderError> {
        match v.as_array().map(Vec::as_slice) {
            Some([a, b]) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => Ok((a, b)),
                _ => Err(self.invalid(field, "must contain two numbers")),
            },
            _ => Err(self.invalid(field, "must be a pair of numbers")),
        }
    }

    fn limits(&self, map: &Map<String, Value>, key: &str) -> Result<Option<(f64, f64)>, RenderError> {
        match map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => {
                let (lo, hi) = self.point(v, key)?;
                if !(lo.is_finite() && hi.is_finite()) {
                    return Err(self.invalid(key, "limits must be finite"));
                }
                // A descending pair flips the axis.
                Ok(Some((lo, hi)))
            }
        }
    }

    fn ticks(&self, map: &Map<String, Value>, key: &str) -> Result<Option<Vec<f64>>, RenderError> {
        match map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| v.as_f64().ok_or_else(|| self.invalid(key, "must contain only numbers")))
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(self.invalid(key, "must be a sequence of numbers")),
        }
    }
}

fn line_style(r: &Reader, style: &Map<String, Value>, prefix: &str) -> Result<LineStyle, RenderError> {
    let defaults = LineStyle::default();
    Ok(LineStyle {
        color: r.color(style, "color", &format!("{prefix}.color"), defaults.color)?,
        dash: r.dash(style, &format!("{prefix}.linestyle"))?,
        marker: r
            .marker(style, &format!("{prefix}.marker"))?
            .unwrap_or(defaults.marker),
    })
}

fn resolve_style<'a>(
    r: &Reader,
    data: &'a ChartData,
    options: &Map<String, Value>,
) -> Result<StyledChart<'a>, RenderError> {
    let style = match options.get("style") {
        Some(v) => Some(r.object(v, "style")?),
        None => None,
    };
    let require_style = || style.ok_or_else(|| r.missing("style"));

    Ok(match data {
        ChartData::Line(xy) => StyledChart::Line {
            xy,
            style: line_style(r, require_style()?, "style")?,
        },
        ChartData::MultiLine { lines } => {
            let styles = lines
                .iter()
                .enumerate()
                .map(|(j, line)| {
                    let field = format!("lines[{j}].style");
                    let raw = line.style.as_ref().ok_or_else(|| r.missing(&field))?;
                    line_style(r, r.object(raw, &field)?, &field)
                })
                .collect::<Result<Vec<_>, _>>()?;
            StyledChart::MultiLine { lines, styles }
        }
        ChartData::Bar(xy) => {
            let style = require_style()?;
            let colors = match style.get("color") {
                None | Some(Value::Null) => BarColors::Uniform(DEFAULT_COLOR),
                Some(Value::Array(items)) => BarColors::Cycle(r.color_list(items, "style.color")?),
                Some(v) => BarColors::Uniform(r.color_value(v, "style.color")?),
            };
            StyledChart::Bar { xy, colors }
        }
        ChartData::Scatter(xy) => {
            let style = require_style()?;
            StyledChart::Scatter {
                xy,
                color: r.color(style, "color", "style.color", DEFAULT_COLOR)?,
                marker: r
                    .marker(style, "style.marker")?
                    .flatten()
                    .unwrap_or(MarkerShape::Circle),
            }
        }
        ChartData::Smith { real, imag } => {
            let (color, marker) = match style {
                Some(style) => (
                    r.color(style, "color", "style.color", crate::style::palette_color(0))?,
                    r.marker(style, "style.marker")?.flatten(),
                ),
                None => (crate::style::palette_color(0), None),
            };
            StyledChart::Smith {
                real,
                imag,
                color,
                marker,
            }
        }
        ChartData::Hist { values } => {
            let style = require_style()?;
            let bins = match style.get("bins") {
                None | Some(Value::Null) => DEFAULT_BINS,
                Some(v) => match v.as_u64() {
                    Some(n) if n >= 1 => n as usize,
                    _ => return Err(r.invalid("style.bins", "must be a positive integer")),
                },
            };
            StyledChart::Hist {
                values,
                bins,
                color: r.color(style, "color", "style.color", DEFAULT_COLOR)?,
            }
        }
        ChartData::Heatmap {
            matrix,
            x_labels,
            y_labels,
        } => {
            let style = require_style()?;
            let cmap = match style.get("cmap") {
                None | Some(Value::Null) => Colormap::parse(DEFAULT_CMAP),
                Some(Value::String(name)) => Colormap::parse(name),
                Some(_) => None,
            }
            .ok_or_else(|| r.invalid("style.cmap", "unknown colormap"))?;
            StyledChart::Heatmap {
                matrix,
                x_labels: x_labels.as_deref(),
                y_labels: y_labels.as_deref(),
                cmap,
                colorbar: r.flag(style, "colorbar", "style.colorbar")?.unwrap_or(true),
            }
        }
        ChartData::Pie { labels, sizes } => {
            let style = require_style()?;
            let colors = match style.get("colors") {
                None | Some(Value::Null) => None,
                Some(Value::Array(items)) => Some(r.color_list(items, "style.colors")?),
                Some(_) => return Err(r.invalid("style.colors", "must be a list of colors")),
            };
            StyledChart::Pie {
                labels,
                sizes,
                colors,
            }
        }
    })
}

fn resolve_overlay(
    r: &Reader,
    options: &Map<String, Value>,
    legend_raw: Option<&Map<String, Value>>,
) -> Result<Overlay, RenderError> {
    let title = match r.kind {
        ChartKind::Heatmap | ChartKind::Pie => {
            let v = r.required(options, "title", "title")?;
            r.text_value(v, "title")?
        }
        _ => r.text(options, "title", "title")?.unwrap_or_default(),
    };

    let mut xlabel = r.text(options, "xlabel", "xlabel")?;
    let mut ylabel = r.text(options, "ylabel", "ylabel")?;
    if r.kind == ChartKind::Smith {
        xlabel.get_or_insert_with(|| "Real".to_string());
        ylabel.get_or_insert_with(|| "Imaginary".to_string());
    }

    let legend = match legend_raw {
        Some(legend) if r.flag(legend, "show", "legend.show")?.unwrap_or(false) => {
            let location = match legend.get("location").or_else(|| legend.get("loc")) {
                None | Some(Value::Null) => LegendLocation::Best,
                Some(Value::String(s)) => s
                    .parse()
                    .map_err(|e: String| r.invalid("legend.location", e))?,
                Some(v) => v
                    .as_u64()
                    .and_then(LegendLocation::from_code)
                    .ok_or_else(|| r.invalid("legend.location", "unknown location code"))?,
            };
            Some(Legend {
                label: r.text(legend, "label", "legend.label")?,
                location,
            })
        }
        _ => None,
    };

    let annotations = match options.get("annotations") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| annotation(r, i, item))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(r.invalid("annotations", "must be a sequence")),
    };

    Ok(Overlay {
        title,
        xlabel,
        ylabel,
        annotations,
        legend,
        grid: r.flag(options, "grid", "grid")?.unwrap_or(false),
        xlim: r.limits(options, "xlim")?,
        ylim: r.limits(options, "ylim")?,
        xticks: r.ticks(options, "xticks")?,
        yticks: r.ticks(options, "yticks")?,
    })
}

fn annotation(r: &Reader, i: usize, item: &Value) -> Result<Annotation, RenderError> {
    let base = format!("annotations[{i}]");
    let obj = r.object(item, &base)?;
    let field = |key: &str| format!("{base}.{key}");

    let text = r.text_value(r.required(obj, "text", &field("text"))?, &field("text"))?;
    let xy = r.point(r.required(obj, "xy", &field("xy"))?, &field("xy"))?;
    let xytext = r.point(r.required(obj, "xytext", &field("xytext"))?, &field("xytext"))?;
    let props = r
        .object(r.required(obj, "arrowprops", &field("arrowprops"))?, &field("arrowprops"))?
        .clone();

    let color_key = ["color", "facecolor", "fc", "edgecolor", "ec"]
        .into_iter()
        .find(|k| props.contains_key(*k));
    let color = match color_key {
        Some(k) => r.color_value(&props[k], &field("arrowprops"))?,
        None => Rgba::rgb(0, 0, 0),
    };
    let width = ["linewidth", "lw", "width"]
        .into_iter()
        .find_map(|k| props.get(k).and_then(Value::as_f64))
        .map(|w| w.round().max(1.0) as u32)
        .unwrap_or(1);
    let head = props.get("arrowstyle").and_then(Value::as_str) != Some("-");
    let shrink = props
        .get("shrink")
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
        .clamp(0.0, 0.45);

    Ok(Annotation {
        text,
        xy,
        xytext,
        arrow: Arrow {
            color,
            width,
            head,
            shrink,
            props,
        },
    })
}
