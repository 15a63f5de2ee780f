//! Dispatch of validated charts onto the figure grid.
//!
//! One pass over the chart list: chart `i` lands in cell
//! `(i / columns, i % columns)`, its options are normalized, the type renderer
//! draws its marks and the generic overlay is applied on top. A global tight
//! layout pass runs once all charts are placed.

mod charts;

use crate::error::RenderError;
use crate::models::Config;
use crate::options::{self, Overlay, ResolvedChart, StyledChart};
use crate::scene::{Figure, Grid, Panel, TickSpec};

/// Row-major cell of the chart at `index` in a grid with `columns` columns.
pub fn cell_for(index: usize, columns: usize) -> (usize, usize) {
    (index / columns, index % columns)
}

/// Render every chart of `config` into a new [`Figure`].
///
/// Fails on the first chart whose options cannot be normalized; the partial
/// figure is dropped.
pub fn render(config: &Config) -> Result<Figure, RenderError> {
    let layout = config.layout;
    let mut grid = Grid::new(layout.rows, layout.columns);

    for (index, spec) in config.charts.iter().enumerate() {
        let (row, col) = cell_for(index, layout.columns);
        let resolved = options::resolve(index, spec)?;
        let panel = grid
            .get_mut(row, col)
            .ok_or(RenderError::CellOutOfRange {
                index,
                rows: layout.rows,
                columns: layout.columns,
            })?;
        log::debug!("chart {index}: {} at cell ({row}, {col})", resolved.kind());

        panel.kind = Some(resolved.kind());
        draw_chart(panel, &resolved);
        apply_overlay(panel, &resolved.overlay);
    }

    let mut figure = Figure {
        grid,
        figsize: layout.figsize,
    };
    figure.tight_layout();
    log::info!(
        "rendered {} chart(s) into a {}x{} grid",
        config.charts.len(),
        layout.rows,
        layout.columns
    );
    Ok(figure)
}

/// Type-specific drawing.
fn draw_chart(panel: &mut Panel, resolved: &ResolvedChart<'_>) {
    let label = resolved.series_label.as_deref();
    match &resolved.chart {
        StyledChart::Line { xy, style } => charts::line(panel, xy, style, label),
        StyledChart::MultiLine { lines, styles } => charts::multi_line(panel, lines, styles),
        StyledChart::Bar { xy, colors } => charts::bar(panel, xy, colors),
        StyledChart::Scatter { xy, color, marker } => charts::scatter(panel, xy, *color, *marker),
        StyledChart::Smith {
            real,
            imag,
            color,
            marker,
        } => charts::smith(panel, real, imag, *color, *marker, label),
        StyledChart::Hist {
            values,
            bins,
            color,
        } => charts::hist(panel, values, *bins, *color),
        StyledChart::Heatmap {
            matrix,
            x_labels,
            y_labels,
            cmap,
            colorbar,
        } => charts::heatmap(panel, matrix, *x_labels, *y_labels, cmap, *colorbar),
        StyledChart::Pie {
            labels,
            sizes,
            colors,
        } => charts::pie(panel, labels, sizes, colors.as_deref()),
    }
}

/// Presentation settings shared by every chart type. Limits and ticks are
/// applied last so they override what the renderer chose.
fn apply_overlay(panel: &mut Panel, overlay: &Overlay) {
    panel.title = overlay.title.clone();
    if overlay.xlabel.is_some() {
        panel.xlabel = overlay.xlabel.clone();
    }
    if overlay.ylabel.is_some() {
        panel.ylabel = overlay.ylabel.clone();
    }
    panel.annotations = overlay.annotations.clone();
    panel.legend = overlay.legend.as_ref().map(|l| l.location);
    panel.grid = overlay.grid;

    panel.xlim = overlay.xlim;
    panel.ylim = overlay.ylim;
    if let Some(ticks) = &overlay.xticks {
        panel.xticks = TickSpec::Positions(ticks.clone());
    }
    if let Some(ticks) = &overlay.yticks {
        panel.yticks = TickSpec::Positions(ticks.clone());
    }
}
