//! Numeric helpers behind the histogram, pie and auto-scaling logic.

use serde::Serialize;

/// One equal-width histogram bin, `[lo, hi)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Bin `values` into `bins` equal-width bins spanning the observed min/max.
///
/// A degenerate range (all values equal) is widened to `[v - 0.5, v + 0.5]`;
/// empty input spans `[0, 1]`. Non-finite values are ignored.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    let bins = bins.max(1);
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let (mut lo, mut hi) = if finite.is_empty() {
        (0.0, 1.0)
    } else {
        (
            finite.iter().cloned().fold(f64::INFINITY, f64::min),
            finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        )
    };
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lo: lo + i as f64 * width,
            hi: if i + 1 == bins {
                hi
            } else {
                lo + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();
    for v in finite {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Geometry of one pie wedge, angles in degrees, counter-clockwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wedge {
    pub start_deg: f64,
    pub end_deg: f64,
    /// Share of the whole in `0..=1`.
    pub fraction: f64,
}

impl Wedge {
    pub fn mid_deg(&self) -> f64 {
        (self.start_deg + self.end_deg) / 2.0
    }

    /// Percentage label, e.g. `"16.7%"`.
    pub fn percent_label(&self) -> String {
        format_percent(self.fraction * 100.0)
    }
}

/// One-decimal percentage, the way `autopct='%1.1f%%'` renders it.
pub fn format_percent(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Split a full circle into wedges proportional to `sizes`, starting at
/// `start_deg` and running counter-clockwise.
pub fn pie_wedges(sizes: &[f64], start_deg: f64) -> Vec<Wedge> {
    let total: f64 = sizes.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut angle = start_deg;
    sizes
        .iter()
        .map(|s| {
            let fraction = s / total;
            let sweep = fraction * 360.0;
            let wedge = Wedge {
                start_deg: angle,
                end_deg: angle + sweep,
                fraction,
            };
            angle += sweep;
            wedge
        })
        .collect()
}

/// Point at `radius` and `deg` (counter-clockwise from +x) around the origin.
pub fn polar(radius: f64, deg: f64) -> (f64, f64) {
    let rad = deg.to_radians();
    (radius * rad.cos(), radius * rad.sin())
}

/// Inclusive data range of `values`, ignoring non-finite entries.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Widen a range by `frac` of its span on both sides; a zero-width range
/// becomes `[v - 1, v + 1]`.
pub fn with_margin((lo, hi): (f64, f64), frac: f64) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * frac;
    (lo - pad, hi + pad)
}
