//! Backend tests. They need a TrueType font; when none can be found
//! (no `CHARTGRID_FONT`, no system fonts) they print a note and pass.

use chartgrid::viz::{self, RenderSettings};
use chartgrid::{Config, Figure, render};
use serde_json::json;
use std::fs;

fn font_available() -> bool {
    match viz::ensure_font(None) {
        Ok(_) => true,
        Err(err) => {
            eprintln!("skipping backend test: {err}");
            false
        }
    }
}

fn sample_figure() -> Figure {
    render(&Config::from_json_str(chartgrid::SAMPLE_CONFIG).unwrap()).unwrap()
}

#[test]
fn sample_grid_writes_svg() {
    if !font_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.svg");
    viz::save(&sample_figure(), &path, &RenderSettings::default()).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    // Titles and pie percentages end up as text.
    assert!(svg.contains("Kreisdiagramm"));
    assert!(svg.contains("50.0%"));
}

#[test]
fn sample_grid_writes_png() {
    if !font_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.png");
    let settings = RenderSettings {
        size: Some((600, 600)),
        locale: "de".into(),
        ..RenderSettings::default()
    };
    viz::save(&sample_figure(), &path, &settings).unwrap();
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn rasterize_fills_an_rgb_buffer() {
    if !font_available() {
        return;
    }
    let settings = RenderSettings {
        dpi: 40.0,
        ..RenderSettings::default()
    };
    let (w, h, pixels) = viz::rasterize(&sample_figure(), &settings).unwrap();
    assert_eq!((w, h), (480, 480));
    assert_eq!(pixels.len(), (w * h * 3) as usize);
    assert!(pixels.iter().any(|&p| p != 255), "something was drawn");
}

#[test]
fn every_overlay_feature_draws() {
    if !font_available() {
        return;
    }
    let config = Config::from_json_str(
        &json!({
            "layout": {"rows": 1, "columns": 2, "figsize": [8, 3]},
            "charts": [
                {
                    "type": "multi_line",
                    "data": {"lines": [
                        {"x": [0, 1, 2, 3], "y": [0, 5, 2, 8], "label": "a",
                         "style": {"linestyle": ":", "marker": "^", "color": "#ff000080"}},
                        {"x": [0, 1, 2, 3], "y": [8, 1, 6, 0], "label": "b",
                         "style": {"linestyle": "-.", "marker": "D", "color": "C2"}}
                    ]},
                    "options": {
                        "grid": true,
                        "legend": {"show": true},
                        "ylim": [-1, 6],
                        "yticks": [0, 2.5, 5],
                        "annotations": [{
                            "text": "peak", "xy": [1, 5], "xytext": [2, 5.5],
                            "arrowprops": {"arrowstyle": "->", "color": "red", "lw": 2}
                        }]
                    }
                },
                {
                    "type": "heatmap",
                    "data": {"matrix": [[0.5, -1], [2, 8]], "y_labels": ["top", "bottom"]},
                    "options": {"title": "Cells", "style": {"cmap": "magma_r"}}
                }
            ]
        })
        .to_string(),
    )
    .unwrap();
    let figure = render(&config).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overlay.svg");
    viz::save(&figure, &path, &RenderSettings::default()).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    for text in ["peak", "2.5", "top", "bottom", "Cells"] {
        assert!(svg.contains(text), "missing {text}");
    }
}
