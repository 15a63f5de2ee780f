use chartgrid::{ChartKind, ValidationError, validate};
use serde_json::{Value, json};

fn line_chart() -> Value {
    json!({
        "type": "line",
        "data": {"x": [1, 2, 3], "y": [1, 4, 9]},
        "options": {"style": {}, "legend": {}}
    })
}

fn doc(rows: u64, columns: u64, charts: Vec<Value>) -> Value {
    json!({"layout": {"rows": rows, "columns": columns}, "charts": charts})
}

#[test]
fn scenario_single_line_chart_validates() {
    let config = validate(&doc(1, 1, vec![line_chart()])).unwrap();
    assert_eq!(config.layout.rows, 1);
    assert_eq!(config.layout.figsize, chartgrid::models::DEFAULT_FIGSIZE);
    assert_eq!(config.charts.len(), 1);
    assert_eq!(config.charts[0].kind(), ChartKind::Line);
}

#[test]
fn scenario_unknown_type_names_its_index() {
    let charts = vec![line_chart(), json!({"type": "unknown", "data": {}}), line_chart()];
    let err = validate(&doc(2, 2, charts)).unwrap_err();
    assert!(
        matches!(&err, ValidationError::UnknownChartType { index: 1, found } if found == "'unknown'"),
        "{err:?}"
    );
    assert_eq!(err.chart_index(), Some(1));
}

#[test]
fn scenario_heatmap_label_mismatch() {
    let chart = json!({
        "type": "heatmap",
        "data": {"matrix": [[1, 2], [3, 4]], "x_labels": ["a"]}
    });
    let err = validate(&doc(1, 1, vec![chart])).unwrap_err();
    match err {
        ValidationError::MalformedChartData {
            index, kind, field, reason,
        } => {
            assert_eq!(index, 0);
            assert_eq!(kind, ChartKind::Heatmap);
            assert_eq!(field, "x_labels");
            assert!(reason.contains("2 columns"), "{reason}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn scenario_pie_length_mismatch() {
    let chart = json!({"type": "pie", "data": {"labels": ["A", "B"], "sizes": [10]}});
    let err = validate(&doc(1, 1, vec![chart])).unwrap_err();
    assert!(
        matches!(&err, ValidationError::MalformedChartData { kind: ChartKind::Pie, field, .. } if field == "sizes"),
        "{err:?}"
    );
}

#[test]
fn scenario_layout_overflow() {
    let charts = vec![line_chart(); 5];
    let err = validate(&doc(2, 2, charts)).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::LayoutOverflow {
            charts: 5,
            rows: 2,
            columns: 2
        }
    ));
}

#[test]
fn layout_checks_run_first() {
    let err = validate(&json!({"layout": {"rows": 0, "columns": 1}, "charts": []})).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidLayout { field: "rows", .. }), "{err:?}");

    let err = validate(&json!({"layout": {"columns": 1}})).unwrap_err();
    assert_eq!(err.field(), Some("layout.rows"));

    let err = validate(&json!({"charts": [1]})).unwrap_err();
    assert_eq!(err.field(), Some("layout"));
}

#[test]
fn figsize_must_be_a_numeric_pair() {
    for bad in [json!([1]), json!(["a", 2]), json!("big"), json!([0, 3])] {
        let d = json!({"layout": {"rows": 1, "columns": 1, "figsize": bad}, "charts": []});
        let err = validate(&d).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidLayout { field: "figsize", .. }), "{err:?}");
    }
    let d = json!({"layout": {"rows": 1, "columns": 1, "figsize": [6, 4.5]}, "charts": [line_chart()]});
    assert_eq!(validate(&d).unwrap().layout.figsize, (6.0, 4.5));
}

#[test]
fn chart_list_shape() {
    let err = validate(&json!({"layout": {"rows": 1, "columns": 1}})).unwrap_err();
    assert!(matches!(&err, ValidationError::MissingField { field } if field == "charts"));

    let err = validate(&json!({"layout": {"rows": 1, "columns": 1}, "charts": {}})).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidChartList));

    let err = validate(&doc(1, 1, vec![])).unwrap_err();
    assert!(matches!(err, ValidationError::EmptyChartList));

    let err = validate(&doc(1, 1, vec![json!("line")])).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidChartEntry { index: 0 }));
}

#[test]
fn first_defect_in_list_order_wins() {
    // Chart 1 has bad data, chart 2 an unknown type: chart 1 is reported.
    let charts = vec![
        line_chart(),
        json!({"type": "scatter", "data": {"x": [1, 2]}}),
        json!({"type": "donut"}),
    ];
    let err = validate(&doc(2, 2, charts)).unwrap_err();
    assert_eq!(err.chart_index(), Some(1));
    assert_eq!(err.field(), Some("y"));

    // Within one chart the type is checked before the data.
    let err = validate(&doc(1, 1, vec![json!({"type": "donut", "data": 3})])).unwrap_err();
    assert!(matches!(err, ValidationError::UnknownChartType { .. }));
}

#[test]
fn missing_and_non_string_types() {
    let err = validate(&doc(1, 1, vec![json!({"data": {}})])).unwrap_err();
    assert!(matches!(&err, ValidationError::MissingField { field } if field == "charts[0].type"));
    assert_eq!(err.chart_index(), Some(0));

    let err = validate(&doc(1, 1, vec![json!({"type": 7})])).unwrap_err();
    assert!(matches!(&err, ValidationError::UnknownChartType { found, .. } if found == "7"));
}

#[test]
fn per_type_shapes() {
    let cases = [
        (json!({"type": "line", "data": {"x": 1, "y": [1]}}), "x"),
        (json!({"type": "bar", "data": {"x": ["a"], "y": [1, 2]}}), "y"),
        (json!({"type": "scatter", "data": {"x": [1, "b"], "y": [1, 2]}}), "x"),
        (json!({"type": "multi_line", "data": {"lines": [{"x": [1], "y": "no"}]}}), "lines[0].y"),
        (json!({"type": "smith", "data": {"real": [0.1]}}), "imag"),
        (json!({"type": "hist", "data": {}}), "values"),
        (json!({"type": "hist", "data": {"values": 3}}), "values"),
        (json!({"type": "heatmap", "data": {"matrix": [1, 2]}}), "matrix"),
        (json!({"type": "heatmap", "data": {"matrix": [[1, 2], [3]]}}), "matrix[1]"),
        (json!({"type": "heatmap", "data": {"matrix": [[1], [2]], "y_labels": ["a"]}}), "y_labels"),
        (json!({"type": "pie", "data": {"labels": ["A"]}}), "sizes"),
    ];
    for (chart, field) in cases {
        let err = validate(&doc(1, 1, vec![chart.clone()])).unwrap_err();
        assert!(
            matches!(err, ValidationError::MalformedChartData { .. }),
            "{chart}: {err:?}"
        );
        assert_eq!(err.field(), Some(field), "{chart}");
    }
}

#[test]
fn options_are_not_inspected() {
    let chart = json!({
        "type": "pie",
        "data": {"labels": ["A", "B"], "sizes": [1, 2]},
        "options": "not even an object"
    });
    assert!(validate(&doc(1, 1, vec![chart])).is_ok());
}

#[test]
fn invalid_json_is_a_syntax_error() {
    let err = chartgrid::Config::from_json_str("{\"layout\": ").unwrap_err();
    assert!(matches!(err, ValidationError::Syntax(_)));
    assert_eq!(err.field(), None);
}

#[test]
fn sample_configuration_validates() {
    let config = chartgrid::Config::from_json_str(chartgrid::SAMPLE_CONFIG).unwrap();
    let kinds: Vec<ChartKind> = config.charts.iter().map(|c| c.kind()).collect();
    assert_eq!(kinds, ChartKind::ALL);
    assert_eq!(config.layout.figsize, (12.0, 12.0));
}

#[test]
fn oversized_grid_is_an_invalid_layout() {
    let d = json!({
        "layout": {"rows": 4294967296u64, "columns": 4294967296u64},
        "charts": [{"type": "hist", "data": {"values": [1, 2]}}]
    });
    let err = validate(&d).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidLayout { field: "columns", .. }), "{err:?}");

    let text = d.to_string();
    assert!(chartgrid::Config::from_json_str(&text).is_err());
}

/// One valid chart of every type in a 3×3 grid.
fn every_kind() -> Value {
    json!({
        "layout": {"rows": 3, "columns": 3, "figsize": [9, 9]},
        "charts": [
            {"type": "line", "data": {"x": [1, 2, 3], "y": [1, 4, 9]}},
            {"type": "multi_line", "data": {"lines": [{"x": [1, 2], "y": [3, 4], "label": "a"}]}},
            {"type": "bar", "data": {"x": ["a", "b", "c"], "y": [1, 2, 3]}},
            {"type": "scatter", "data": {"x": [1, 2], "y": [2, 1]}},
            {"type": "smith", "data": {"real": [0.1, 0.2], "imag": [0.0, 0.1]}},
            {"type": "hist", "data": {"values": [1, 2, 2, 3]}},
            {"type": "heatmap", "data": {"matrix": [[1, 2], [3, 4]],
                                         "x_labels": ["a", "b"], "y_labels": ["c", "d"]}},
            {"type": "pie", "data": {"labels": ["A", "B"], "sizes": [1, 2]}}
        ]
    })
}

fn variant(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::Syntax(_) => "Syntax",
        ValidationError::MissingField { .. } => "MissingField",
        ValidationError::InvalidLayout { .. } => "InvalidLayout",
        ValidationError::InvalidChartList => "InvalidChartList",
        ValidationError::EmptyChartList => "EmptyChartList",
        ValidationError::LayoutOverflow { .. } => "LayoutOverflow",
        ValidationError::InvalidChartEntry { .. } => "InvalidChartEntry",
        ValidationError::UnknownChartType { .. } => "UnknownChartType",
        ValidationError::MalformedChartData { .. } => "MalformedChartData",
    }
}

/// Replace (or with `None`, remove) the value at a JSON pointer.
fn mutate(doc: &mut Value, pointer: &str, value: Option<Value>) {
    match value {
        Some(v) => *doc.pointer_mut(pointer).unwrap() = v,
        None => {
            let (parent, key) = pointer.rsplit_once('/').unwrap();
            doc.pointer_mut(parent)
                .and_then(Value::as_object_mut)
                .unwrap()
                .remove(key)
                .unwrap();
        }
    }
}

#[test]
fn each_single_defect_yields_its_own_error() {
    assert!(validate(&every_kind()).is_ok());

    #[rustfmt::skip]
    let cases: Vec<(&str, Option<Value>, &str, Option<usize>, &str)> = vec![
        ("/layout/rows", None, "MissingField", None, "layout.rows"),
        ("/layout/rows", Some(json!(0)), "InvalidLayout", None, "rows"),
        ("/layout/columns", Some(json!("3")), "InvalidLayout", None, "columns"),
        ("/layout/figsize", Some(json!([9])), "InvalidLayout", None, "figsize"),
        ("/charts", Some(json!({})), "InvalidChartList", None, "charts"),
        ("/charts", Some(json!([])), "EmptyChartList", None, "charts"),
        ("/layout/rows", Some(json!(2)), "LayoutOverflow", None, "charts"),
        ("/charts/2", Some(json!("bar")), "InvalidChartEntry", Some(2), ""),
        ("/charts/5/type", None, "MissingField", Some(5), "charts[5].type"),
        ("/charts/3/type", Some(json!("donut")), "UnknownChartType", Some(3), "type"),
        ("/charts/0/data/y", Some(json!([1, 2])), "MalformedChartData", Some(0), "y"),
        ("/charts/1/data/lines/0/x", Some(json!("no")), "MalformedChartData", Some(1), "lines[0].x"),
        ("/charts/2/data/x", Some(json!([1, "b", 3])), "MalformedChartData", Some(2), "x"),
        ("/charts/3/data/y", Some(Value::Null), "MalformedChartData", Some(3), "y"),
        ("/charts/4/data/imag", Some(json!([0.1])), "MalformedChartData", Some(4), "imag"),
        ("/charts/5/data/values", Some(json!("many")), "MalformedChartData", Some(5), "values"),
        ("/charts/6/data/matrix/1", Some(json!([3])), "MalformedChartData", Some(6), "matrix[1]"),
        ("/charts/6/data/x_labels", Some(json!(["a"])), "MalformedChartData", Some(6), "x_labels"),
        ("/charts/6/data/y_labels", Some(json!(["c", "d", "e"])), "MalformedChartData", Some(6), "y_labels"),
        ("/charts/7/data/sizes", None, "MalformedChartData", Some(7), "sizes"),
        ("/charts/7/data/sizes", Some(json!([-1, 2])), "MalformedChartData", Some(7), "sizes"),
    ];

    for (pointer, value, expected, index, field) in cases {
        let mut doc = every_kind();
        mutate(&mut doc, pointer, value.clone());
        let err = validate(&doc).unwrap_err();
        let case = format!("{pointer} = {value:?}");
        assert_eq!(variant(&err), expected, "{case}: {err:?}");
        assert_eq!(err.chart_index(), index, "{case}");
        if !field.is_empty() {
            assert_eq!(err.field(), Some(field), "{case}");
        }
    }
}
