//! chartgrid
//!
//! Render a grid of charts described by one JSON document to SVG, PNG or an
//! in-memory RGB buffer. Pairs with the `chartgrid` CLI and the
//! `chartgrid-view` desktop viewer.
//!
//! ### Features
//! - Structural validation with precise, ordered error reporting
//! - Eight chart types: line, multi_line, bar, scatter, smith, hist, heatmap, pie
//! - Shared overlay options: title, axis labels, legend, annotations, grid,
//!   limits and explicit ticks
//! - Row/column aligned gutters so tick labels never overlap neighbours
//!
//! ### Example
//! ```no_run
//! use chartgrid::{Config, RenderSettings};
//!
//! let config = Config::from_json_str(chartgrid::SAMPLE_CONFIG)?;
//! let figure = chartgrid::render(&config)?;
//! chartgrid::viz::save(&figure, "grid.png", &RenderSettings::default())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod error;
pub mod models;
pub mod options;
pub mod render;
pub mod scene;
pub mod smith;
pub mod stats;
pub mod style;
pub mod validate;
pub mod viz;

pub use error::{RenderError, ValidationError};
pub use models::{ChartKind, Config};
pub use render::render;
pub use scene::Figure;
pub use validate::validate;
pub use viz::RenderSettings;

/// The 3×3 demonstration grid covering every chart type.
pub const SAMPLE_CONFIG: &str = include_str!("../demos/sample_grid.json");
