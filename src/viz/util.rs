//! Utility functions for visualization: colors, tick formatting, locale mapping.

use crate::style::Rgba;
use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

use super::text::estimate_text_width_px;

/// Convert a parsed color into a plotters color.
#[inline]
pub fn to_rgba(c: Rgba) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, c.opacity())
}

/// Map a user-provided locale tag to a `num_format::Locale`. Its grouping and
/// decimal separators drive [`format_tick`].
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

fn decimal_separator(locale: &Locale) -> &str {
    locale.decimal()
}

/// Tick label for `v`: whole numbers get thousands separators (`30,000` vs
/// `30.000`), fractions get two, one or no decimals depending on magnitude,
/// with trailing zeros removed.
pub fn format_tick(v: f64, locale: &Locale) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let v = if v == 0.0 { 0.0 } else { v }; // no "-0"
    let a = v.abs();
    if (v - v.round()).abs() < 1e-9 && a < 1e15 {
        return (v.round() as i64).to_formatted_string(locale);
    }
    let prec = if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else if a >= 0.01 {
        2
    } else {
        4
    };
    let s = format!("{:.*}", prec, v);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    s.replace('.', decimal_separator(locale))
}

/// Compute a tight left label area width for the Y axis (in pixels),
/// based on the formatted tick labels that will appear.
/// - `ymin..ymax`: the Y range passed to Plotters
/// - `ticks`: how many Y labels you plan to show
/// - `font_px`: font size used for axis labels
/// - `locale`: the locale the labels are drawn with
///
/// Returns a width clamped to a sensible range to avoid extremes.
pub fn compute_left_label_area_px(
    ymin: f64,
    ymax: f64,
    ticks: usize,
    font_px: u32,
    locale: &Locale,
) -> u32 {
    let mut max_px = 0u32;
    for i in 0..=ticks {
        let t = if ticks == 0 {
            0.0
        } else {
            i as f64 / ticks as f64
        };
        let v = ymin + (ymax - ymin) * t;
        let s = format_tick(v, locale);
        max_px = max_px.max(estimate_text_width_px(&s, font_px));
    }

    // Padding for tick marks.
    let with_padding = max_px.saturating_add(18);
    with_padding.clamp(36, 140)
}

/// Up to `max_count` evenly spaced "round" values (steps of 1, 2 or 5 × 10ⁿ)
/// inside `range`, ascending. The range may be given in either direction.
pub fn nice_ticks(range: (f64, f64), max_count: usize) -> Vec<f64> {
    let (lo, hi) = if range.0 <= range.1 {
        range
    } else {
        (range.1, range.0)
    };
    if !(lo.is_finite() && hi.is_finite()) || hi - lo < f64::EPSILON {
        return vec![lo];
    }
    let raw = (hi - lo) / max_count.max(1) as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * mag)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * mag);
    let first = (lo / step).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_follow_locale() {
        assert_eq!(format_tick(30000.0, &Locale::en), "30,000");
        assert_eq!(format_tick(30000.0, &Locale::de), "30.000");
        assert_eq!(format_tick(2.5, &Locale::en), "2.5");
        assert_eq!(format_tick(2.5, &Locale::de), "2,5");
        assert_eq!(format_tick(-0.0, &Locale::en), "0");
        assert_eq!(format_tick(12.34, &Locale::en), "12.3");
    }

    #[test]
    fn locale_tags_map_to_separators() {
        assert_eq!(format_tick(2.5, map_locale("DE")), "2,5");
        assert_eq!(format_tick(30000.0, map_locale("german")), "30.000");
        assert_eq!(format_tick(2.5, map_locale("klingon")), "2.5");
    }

    #[test]
    fn nice_ticks_use_round_steps() {
        assert_eq!(nice_ticks((0.0, 10.0), 6), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks((10.0, 0.0), 6), nice_ticks((0.0, 10.0), 6));
        assert_eq!(nice_ticks((-30.0, 70.0), 5), vec![-20.0, 0.0, 20.0, 40.0, 60.0]);
        assert_eq!(nice_ticks((3.0, 3.0), 6), vec![3.0]);
    }

    #[test]
    fn left_label_area_is_clamped() {
        let narrow = compute_left_label_area_px(0.0, 1.0, 5, 12, &Locale::en);
        let wide = compute_left_label_area_px(0.0, 1.0e12, 5, 12, &Locale::en);
        assert!(narrow >= 36);
        assert!(wide > narrow);
        assert!(wide <= 140);
    }
}
