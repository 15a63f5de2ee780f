//! Error taxonomy for validation and rendering.
//!
//! Validation errors are raised before any panel exists; render errors abort a
//! render pass while a chart's options are being normalized. Backend failures
//! (fonts, drawing, file I/O) are reported as `anyhow::Error` by [`crate::viz`].

use crate::models::ChartKind;
use thiserror::Error;

/// A configuration document is not structurally well-formed.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// A required key is absent at the expected nesting level.
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    /// `rows`/`columns` below 1 or not integers, or a malformed `figsize`.
    #[error("invalid layout field '{field}': {reason}")]
    InvalidLayout { field: &'static str, reason: String },

    /// `charts` is present but not a sequence.
    #[error("'charts' must be a sequence of chart specifications")]
    InvalidChartList,

    #[error("at least one chart must be defined")]
    EmptyChartList,

    #[error("{charts} charts do not fit into a {rows}x{columns} layout")]
    LayoutOverflow {
        charts: usize,
        rows: usize,
        columns: usize,
    },

    /// A chart entry is not an object.
    #[error("chart {index}: chart specification must be an object")]
    InvalidChartEntry { index: usize },

    #[error("chart {index}: unknown chart type {found}")]
    UnknownChartType { index: usize, found: String },

    /// A required data field is missing or has the wrong shape.
    #[error("chart {index} ({kind}): field '{field}' {reason}")]
    MalformedChartData {
        index: usize,
        kind: ChartKind,
        field: String,
        reason: String,
    },
}

impl ValidationError {
    /// Name of the offending field, if the error concerns one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField { field } => Some(field),
            ValidationError::InvalidLayout { field, .. } => Some(field),
            ValidationError::InvalidChartList
            | ValidationError::EmptyChartList
            | ValidationError::LayoutOverflow { .. } => Some("charts"),
            ValidationError::UnknownChartType { .. } => Some("type"),
            ValidationError::MalformedChartData { field, .. } => Some(field),
            ValidationError::Syntax(_) | ValidationError::InvalidChartEntry { .. } => None,
        }
    }

    /// Position of the offending chart in the chart list, if any.
    pub fn chart_index(&self) -> Option<usize> {
        match self {
            ValidationError::InvalidChartEntry { index }
            | ValidationError::UnknownChartType { index, .. }
            | ValidationError::MalformedChartData { index, .. } => Some(*index),
            ValidationError::MissingField { field } => field
                .strip_prefix("charts[")
                .and_then(|rest| rest.split(']').next())
                .and_then(|n| n.parse().ok()),
            _ => None,
        }
    }
}

/// A chart's options cannot be normalized while rendering.
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    /// A field read at render time without a fallback is absent.
    #[error("chart {index} ({kind}): missing option '{field}'")]
    MissingOption {
        index: usize,
        kind: ChartKind,
        field: String,
    },

    /// An option is present but unusable (wrong type, unknown name, …).
    #[error("chart {index} ({kind}): invalid option '{field}': {reason}")]
    InvalidOption {
        index: usize,
        kind: ChartKind,
        field: String,
        reason: String,
    },

    /// The chart list does not fit the grid (only reachable for hand-built
    /// configurations that skipped validation).
    #[error("chart {index} does not fit into a {rows}x{columns} grid")]
    CellOutOfRange {
        index: usize,
        rows: usize,
        columns: usize,
    },
}

impl RenderError {
    pub fn field(&self) -> &str {
        match self {
            RenderError::MissingOption { field, .. } | RenderError::InvalidOption { field, .. } => {
                field
            }
            RenderError::CellOutOfRange { .. } => "charts",
        }
    }

    pub fn chart_index(&self) -> usize {
        match self {
            RenderError::MissingOption { index, .. }
            | RenderError::InvalidOption { index, .. }
            | RenderError::CellOutOfRange { index, .. } => *index,
        }
    }
}
