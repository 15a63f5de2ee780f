use chartgrid::options::LegendLocation;
use chartgrid::scene::{Frame, Mark, Panel, TickSpec};
use chartgrid::{ChartKind, Config, RenderError, render, validate};
use serde_json::{Value, json};

fn config(rows: u64, columns: u64, charts: Vec<Value>) -> Config {
    validate(&json!({"layout": {"rows": rows, "columns": columns}, "charts": charts})).unwrap()
}

fn single(chart: Value) -> Result<Panel, RenderError> {
    let figure = render(&config(1, 1, vec![chart]))?;
    Ok(figure.grid.get(0, 0).unwrap().clone())
}

fn polylines(panel: &Panel) -> usize {
    panel
        .marks
        .iter()
        .filter(|m| matches!(m, Mark::Polyline { .. }))
        .count()
}

#[test]
fn single_line_chart_draws_one_polyline() {
    let panel = single(json!({
        "type": "line",
        "data": {"x": [1, 2, 3], "y": [1, 4, 9]},
        "options": {"style": {}, "legend": {}}
    }))
    .unwrap();
    assert_eq!(panel.kind, Some(ChartKind::Line));
    assert_eq!(polylines(&panel), 1);
    assert_eq!(panel.marks.len(), 1);
    assert_eq!(panel.title, "");
    assert!(panel.legend.is_none());
}

#[test]
fn charts_fill_cells_row_major_and_leave_the_rest_blank() {
    let line = json!({
        "type": "line",
        "data": {"x": [1, 2], "y": [1, 2]},
        "options": {"style": {}, "legend": {}}
    });
    let hist = json!({
        "type": "hist",
        "data": {"values": [1, 2, 2, 3]},
        "options": {"style": {"bins": 3}}
    });
    let figure = render(&config(2, 2, vec![line.clone(), hist, line])).unwrap();
    let kinds: Vec<Option<ChartKind>> = figure.grid.iter().map(|(_, p)| p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            Some(ChartKind::Line),
            Some(ChartKind::Hist),
            Some(ChartKind::Line),
            None
        ]
    );
    assert!(figure.grid.get(1, 1).unwrap().is_blank());
    assert_eq!(figure.grid.as_rows().len(), 2);
}

#[test]
fn one_by_one_layout_is_still_a_grid() {
    let figure = render(&config(
        1,
        1,
        vec![json!({
            "type": "scatter",
            "data": {"x": [1], "y": [1]},
            "options": {"style": {}}
        })],
    ))
    .unwrap();
    assert_eq!((figure.grid.rows(), figure.grid.columns()), (1, 1));
    assert!(figure.grid.get(0, 0).is_some());
}

#[test]
fn missing_style_fails_for_line_but_not_smith() {
    let err = single(json!({
        "type": "line",
        "data": {"x": [1, 2], "y": [1, 2]},
        "options": {"legend": {}}
    }))
    .unwrap_err();
    assert_eq!(
        err,
        RenderError::MissingOption {
            index: 0,
            kind: ChartKind::Line,
            field: "style".into()
        }
    );

    let panel = single(json!({
        "type": "smith",
        "data": {"real": [0.2, 0.5], "imag": [0.1, 0.3]},
        "options": {"legend": {"show": false}}
    }))
    .unwrap();
    assert!(matches!(panel.frame, Frame::Square { axes: true, .. }));
    assert_eq!(panel.xlabel.as_deref(), Some("Real"));
    assert_eq!(panel.ylabel.as_deref(), Some("Imaginary"));
}

#[test]
fn required_option_fields_per_type() {
    let cases = [
        (json!({"type": "scatter", "data": {"x": [1], "y": [1]}}), "options"),
        (
            json!({"type": "line", "data": {"x": [1], "y": [1]}, "options": {"style": {}}}),
            "legend",
        ),
        (
            json!({"type": "smith", "data": {"real": [0.1], "imag": [0.1]}, "options": {"legend": {}}}),
            "legend.show",
        ),
        (
            json!({"type": "pie", "data": {"labels": ["A"], "sizes": [1]}, "options": {"style": {}}}),
            "title",
        ),
        (
            json!({"type": "heatmap", "data": {"matrix": [[1]]}, "options": {"style": {}}}),
            "title",
        ),
        (
            json!({"type": "heatmap", "data": {"matrix": [[1]]}, "options": {"title": "t"}}),
            "style",
        ),
        (
            json!({"type": "multi_line", "data": {"lines": [{"x": [1], "y": [1]}]}, "options": {}}),
            "lines[0].style",
        ),
        (
            json!({"type": "line", "data": {"x": [1], "y": [1]}, "options": {
                "style": {}, "legend": {},
                "annotations": [{"text": "a", "xy": [1, 1], "xytext": [1, 1]}]
            }}),
            "annotations[0].arrowprops",
        ),
    ];
    for (chart, field) in cases {
        let err = single(chart.clone()).unwrap_err();
        assert!(matches!(err, RenderError::MissingOption { .. }), "{chart}: {err:?}");
        assert_eq!(err.field(), field, "{chart}");
    }
}

#[test]
fn title_defaults_to_empty_except_for_pie_and_heatmap() {
    let panel = single(json!({
        "type": "bar",
        "data": {"x": ["a", "b"], "y": [1, 2]},
        "options": {"style": {}}
    }))
    .unwrap();
    assert_eq!(panel.title, "");

    let panel = single(json!({
        "type": "pie",
        "data": {"labels": ["A", "B"], "sizes": [1, 3]},
        "options": {"title": "Share", "style": {}}
    }))
    .unwrap();
    assert_eq!(panel.title, "Share");
    assert!(matches!(panel.frame, Frame::Square { axes: false, .. }));
}

#[test]
fn overlay_limits_and_ticks_override_auto_scaling() {
    let panel = single(json!({
        "type": "line",
        "data": {"x": ["a", "b", "c"], "y": [1, 4, 9]},
        "options": {
            "style": {"color": "red", "linestyle": "--", "marker": "o"},
            "legend": {"show": true, "label": "squares", "location": "upper left"},
            "grid": true,
            "xlim": [0, 10],
            "xticks": [0, 5, 10],
            "xlabel": "x",
            "title": "Squares"
        }
    }))
    .unwrap();
    assert_eq!(panel.x_range(), (0.0, 10.0));
    assert_eq!(panel.xticks, TickSpec::Positions(vec![0.0, 5.0, 10.0]));
    assert_eq!(panel.legend, Some(LegendLocation::UpperLeft));
    assert_eq!(panel.legend_entries.len(), 1);
    assert_eq!(panel.legend_entries[0].label, "squares");
    assert!(panel.grid);
    assert_eq!(panel.xlabel.as_deref(), Some("x"));
    assert_eq!(panel.ylabel, None);
    // A polyline plus its markers.
    assert_eq!(panel.marks.len(), 2);
}

#[test]
fn invalid_options_are_reported() {
    let err = single(json!({
        "type": "line",
        "data": {"x": [1], "y": [1]},
        "options": {"style": {"color": "not-a-colour"}, "legend": {}}
    }))
    .unwrap_err();
    assert!(matches!(err, RenderError::InvalidOption { .. }));
    assert_eq!(err.field(), "style.color");

    let err = single(json!({
        "type": "hist",
        "data": {"values": [1]},
        "options": {"style": {"bins": 0}}
    }))
    .unwrap_err();
    assert_eq!(err.field(), "style.bins");

    let err = single(json!({
        "type": "scatter",
        "data": {"x": [1], "y": [1]},
        "options": {"style": {}, "ylim": [0, "top"]}
    }))
    .unwrap_err();
    assert_eq!(err.field(), "ylim");
}

#[test]
fn descending_limits_flip_the_axis() {
    let panel = single(json!({
        "type": "line",
        "data": {"x": [1, 2, 3], "y": [1, 4, 9]},
        "options": {"style": {}, "legend": {}, "xlim": [3, 1], "ylim": [10, 0]}
    }))
    .unwrap();
    assert_eq!(panel.x_range(), (3.0, 1.0));
    assert_eq!(panel.y_range(), (10.0, 0.0));
}

#[test]
fn css4_color_names_are_accepted() {
    for color in ["beige", "aliceblue", "rebeccapurple", "papayawhip"] {
        let panel = single(json!({
            "type": "line",
            "data": {"x": [1, 2], "y": [1, 2]},
            "options": {"style": {"color": color}, "legend": {}}
        }));
        assert!(panel.is_ok(), "{color}: {:?}", panel.err());
    }
}

#[test]
fn render_error_names_the_failing_chart() {
    let ok = json!({"type": "scatter", "data": {"x": [1], "y": [1]}, "options": {"style": {}}});
    let bad = json!({"type": "scatter", "data": {"x": [1], "y": [1]}});
    let err = render(&config(1, 3, vec![ok.clone(), ok, bad])).unwrap_err();
    assert_eq!(err.chart_index(), 2);
    assert!(err.to_string().contains("chart 2 (scatter)"), "{err}");
}

#[test]
fn tight_layout_aligns_gutters_across_the_grid() {
    let figure = render(&Config::from_json_str(chartgrid::SAMPLE_CONFIG).unwrap()).unwrap();
    for r in 0..3 {
        let top: Vec<u32> = (0..3)
            .filter_map(|c| figure.grid.get(r, c))
            .filter(|p| !p.is_blank())
            .map(|p| p.gutters.top)
            .collect();
        assert!(top.windows(2).all(|w| w[0] == w[1]), "row {r}: {top:?}");
    }
    // Every panel in the sample has a title.
    assert!(figure.grid.iter().all(|(_, p)| p.is_blank() || p.gutters.top > 8));
    assert_eq!(figure.pixel_size(100.0), (1200, 1200));
}
