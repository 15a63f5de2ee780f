use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Figure size (inches) used when the layout does not specify one.
pub const DEFAULT_FIGSIZE: (f64, f64) = (10.0, 8.0);

/// The closed set of chart types understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    MultiLine,
    Bar,
    Scatter,
    Smith,
    Hist,
    Heatmap,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 8] = [
        ChartKind::Line,
        ChartKind::MultiLine,
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Smith,
        ChartKind::Hist,
        ChartKind::Heatmap,
        ChartKind::Pie,
    ];

    /// Name used for `type` in the configuration document.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::MultiLine => "multi_line",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
            ChartKind::Smith => "smith",
            ChartKind::Hist => "hist",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown chart type '{s}'"))
    }
}

/// Grid geometry of the figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layout {
    pub rows: usize,
    pub columns: usize,
    /// Width and height in inches.
    pub figsize: (f64, f64),
}

impl Layout {
    /// Number of grid cells; saturates for hand-built layouts.
    pub fn cells(&self) -> usize {
        self.rows.saturating_mul(self.columns)
    }
}

/// A validated configuration. Immutable once built by [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub layout: Layout,
    pub charts: Vec<ChartSpec>,
}

impl Config {
    /// Parse JSON text and validate it in one step.
    pub fn from_json_str(text: &str) -> Result<Self, crate::error::ValidationError> {
        let raw: Value = serde_json::from_str(text)?;
        crate::validate::validate(&raw)
    }
}

/// One panel: its typed data payload and its (not yet normalized) options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub data: ChartData,
    /// Raw `options` value; `None` when the chart has no `options` key.
    /// Options are only interpreted at render time, see [`crate::options`].
    pub options: Option<Value>,
}

impl ChartSpec {
    pub fn kind(&self) -> ChartKind {
        self.data.kind()
    }
}

/// Values along the x axis: numbers, or category names placed at `0..n`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Axis {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Axis {
    pub fn len(&self) -> usize {
        match self {
            Axis::Numeric(v) => v.len(),
            Axis::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plot positions: the numbers themselves, or category indices.
    pub fn positions(&self) -> Vec<f64> {
        match self {
            Axis::Numeric(v) => v.clone(),
            Axis::Categorical(v) => (0..v.len()).map(|i| i as f64).collect(),
        }
    }

    pub fn categories(&self) -> Option<&[String]> {
        match self {
            Axis::Numeric(_) => None,
            Axis::Categorical(v) => Some(v),
        }
    }
}

/// Paired x/y series shared by line, bar and scatter charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XY {
    pub x: Axis,
    pub y: Vec<f64>,
}

impl XY {
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.positions().into_iter().zip(self.y.iter().copied()).collect()
    }
}

/// One entry of a `multi_line` chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineEntry {
    pub xy: XY,
    /// Raw per-line `style`, interpreted at render time.
    pub style: Option<Value>,
    pub label: Option<String>,
}

/// Chart payload, one variant per [`ChartKind`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Line(XY),
    MultiLine {
        lines: Vec<LineEntry>,
    },
    Bar(XY),
    Scatter(XY),
    Smith {
        real: Vec<f64>,
        imag: Vec<f64>,
    },
    Hist {
        values: Vec<f64>,
    },
    Heatmap {
        matrix: Vec<Vec<f64>>,
        x_labels: Option<Vec<String>>,
        y_labels: Option<Vec<String>>,
    },
    Pie {
        labels: Vec<String>,
        sizes: Vec<f64>,
    },
}

impl ChartData {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::Line(_) => ChartKind::Line,
            ChartData::MultiLine { .. } => ChartKind::MultiLine,
            ChartData::Bar(_) => ChartKind::Bar,
            ChartData::Scatter(_) => ChartKind::Scatter,
            ChartData::Smith { .. } => ChartKind::Smith,
            ChartData::Hist { .. } => ChartKind::Hist,
            ChartData::Heatmap { .. } => ChartKind::Heatmap,
            ChartData::Pie { .. } => ChartKind::Pie,
        }
    }
}
