use approx::assert_abs_diff_eq;
use chartgrid::models::ChartKind;
use chartgrid::render::cell_for;
use chartgrid::stats::{histogram, pie_wedges};
use chartgrid::{ValidationError, smith, validate};
use proptest::prelude::*;
use serde_json::json;

fn scatter() -> serde_json::Value {
    json!({"type": "scatter", "data": {"x": [1, 2], "y": [3, 4]}, "options": {"style": {}}})
}

proptest! {
    #[test]
    fn chart_count_fits_or_overflows(rows in 1u64..5, columns in 1u64..5, count in 1usize..30) {
        let doc = json!({
            "layout": {"rows": rows, "columns": columns},
            "charts": vec![scatter(); count],
        });
        let cells = (rows * columns) as usize;
        match validate(&doc) {
            Ok(config) => {
                prop_assert!(count <= cells);
                prop_assert!(config.charts.len() <= config.layout.cells());
                prop_assert!(chartgrid::render(&config).is_ok());
            }
            Err(ValidationError::LayoutOverflow { charts, .. }) => {
                prop_assert!(count > cells);
                prop_assert_eq!(charts, count);
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn unknown_types_fail_before_data_checks(name in "[a-z_]{1,12}") {
        prop_assume!(name.parse::<ChartKind>().is_err());
        // Data that no chart type would accept.
        let doc = json!({
            "layout": {"rows": 1, "columns": 1},
            "charts": [{"type": name, "data": {"x": 1}}],
        });
        let err = validate(&doc).unwrap_err();
        prop_assert!(
            matches!(err, ValidationError::UnknownChartType { index: 0, .. }),
            "unexpected error {:?}",
            err
        );
    }

    #[test]
    fn cells_are_row_major(index in 0usize..1000, columns in 1usize..50) {
        let (row, col) = cell_for(index, columns);
        prop_assert!(col < columns);
        prop_assert_eq!(row * columns + col, index);
    }

    #[test]
    fn pie_percentages_sum_to_one_hundred(sizes in prop::collection::vec(0.01f64..1000.0, 1..12)) {
        let wedges = pie_wedges(&sizes, 90.0);
        prop_assert_eq!(wedges.len(), sizes.len());
        let total: f64 = wedges
            .iter()
            .map(|w| w.percent_label().trim_end_matches('%').parse::<f64>().unwrap())
            .sum();
        // Each label is rounded to one decimal.
        prop_assert!((total - 100.0).abs() <= 0.05 * sizes.len() as f64 + 1e-9, "sum {}", total);
        let last = wedges.last().unwrap();
        prop_assert!((last.end_deg - 450.0).abs() < 1e-6);
    }

    #[test]
    fn histogram_counts_every_value(
        values in prop::collection::vec(-1.0e6f64..1.0e6, 0..200),
        bins in 1usize..40,
    ) {
        let hist = histogram(&values, bins);
        prop_assert_eq!(hist.len(), bins);
        prop_assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), values.len());
        for pair in hist.windows(2) {
            prop_assert!((pair[0].hi - pair[1].lo).abs() < 1e-6);
        }
    }

    #[test]
    fn smith_trace_stays_in_the_disk(points in prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1..20)) {
        let points: Vec<(f64, f64)> = points.into_iter().filter(|(re, im)| re.hypot(*im) <= 1.0).collect();
        let (real, imag): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
        for sample in smith::reflection_trace(&real, &imag) {
            prop_assert!(sample.gamma.norm() <= 1.0 + 1e-12);
        }
    }
}

#[test]
fn smith_grid_never_leaves_the_unit_disk() {
    for line in smith::grid_lines() {
        for (x, y) in line {
            assert!(x.hypot(y) <= 1.0 + 1e-9, "({x}, {y}) outside the disk");
        }
    }
}

#[test]
fn sample_pie_percentages() {
    let wedges = pie_wedges(&[10.0, 20.0, 30.0], 90.0);
    let labels: Vec<String> = wedges.iter().map(|w| w.percent_label()).collect();
    assert_eq!(labels, ["16.7%", "33.3%", "50.0%"]);
    assert_abs_diff_eq!(wedges[0].start_deg, 90.0);
    assert_abs_diff_eq!(wedges[0].end_deg, 150.0, epsilon = 1e-9);
}
