//! Pixel-space helpers: data→pixel projection, clipping, dash patterns,
//! arrow heads and wedge outlines.

use crate::options::LegendLocation;
use crate::stats::polar;

/// Linear mapping from a panel's data ranges onto its plotting rectangle.
/// A descending range (`x.0 > x.1`) flips that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Projection {
    pub fn map(&self, (x, y): (f64, f64)) -> (i32, i32) {
        let fx = (x - self.x.0) / (self.x.1 - self.x.0);
        let fy = (y - self.y.0) / (self.y.1 - self.y.0);
        let px = self.left as f64 + fx * (self.right - self.left) as f64;
        let py = self.bottom as f64 - fy * (self.bottom - self.top) as f64;
        (px.round() as i32, py.round() as i32)
    }

    /// `(min, max)` of the visible x range, whatever its direction.
    pub fn x_bounds(&self) -> (f64, f64) {
        ascending(self.x)
    }

    pub fn y_bounds(&self) -> (f64, f64) {
        ascending(self.y)
    }

    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        let (x0, x1) = self.x_bounds();
        let (y0, y1) = self.y_bounds();
        let eps = 1e-9 * ((x1 - x0) + (y1 - y0));
        x >= x0 - eps && x <= x1 + eps && y >= y0 - eps && y <= y1 + eps
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Liang–Barsky clipping of the segment `a→b` against the data ranges.
    pub fn clip_segment(
        &self,
        a: (f64, f64),
        b: (f64, f64),
    ) -> Option<((f64, f64), (f64, f64))> {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let (x0, x1) = self.x_bounds();
        let (y0, y1) = self.y_bounds();
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        let checks = [(-dx, a.0 - x0), (dx, x1 - a.0), (-dy, a.1 - y0), (dy, y1 - a.1)];
        for (p, q) in checks {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
        Some((
            (a.0 + t0 * dx, a.1 + t0 * dy),
            (a.0 + t1 * dx, a.1 + t1 * dy),
        ))
    }

    /// Clip a polyline; returns the visible runs in pixel coordinates.
    /// Non-finite points break the line.
    pub fn clip_polyline(&self, points: &[(f64, f64)]) -> Vec<Vec<(i32, i32)>> {
        let mut runs: Vec<Vec<(i32, i32)>> = Vec::new();
        let mut cur: Vec<(i32, i32)> = Vec::new();
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let finite = a.0.is_finite() && a.1.is_finite() && b.0.is_finite() && b.1.is_finite();
            let clipped = if finite { self.clip_segment(a, b) } else { None };
            match clipped {
                Some((ca, cb)) => {
                    let (pa, pb) = (self.map(ca), self.map(cb));
                    if cur.last() != Some(&pa) {
                        if !cur.is_empty() {
                            runs.push(std::mem::take(&mut cur));
                        }
                        cur.push(pa);
                    }
                    cur.push(pb);
                }
                None => {
                    if cur.len() > 1 {
                        runs.push(std::mem::take(&mut cur));
                    }
                    cur.clear();
                }
            }
        }
        if cur.len() > 1 {
            runs.push(cur);
        }
        runs
    }

    /// Clip an axis-aligned data rectangle; `None` when fully outside.
    pub fn clip_rect(&self, x0: f64, x1: f64, y0: f64, y1: f64) -> Option<[(i32, i32); 2]> {
        let (bx0, bx1) = self.x_bounds();
        let (by0, by1) = self.y_bounds();
        let (xa, xb) = (x0.min(x1).max(bx0), x0.max(x1).min(bx1));
        let (ya, yb) = (y0.min(y1).max(by0), y0.max(y1).min(by1));
        if xa >= xb || ya >= yb {
            return None;
        }
        let (p, q) = (self.map((xa, yb)), self.map((xb, ya)));
        Some([(p.0.min(q.0), p.1.min(q.1)), (p.0.max(q.0), p.1.max(q.1))])
    }
}

/// `(min, max)` of a range given in either direction.
pub fn ascending((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Split a pixel polyline into the "on" pieces of a dash pattern.
/// An empty pattern returns the line unchanged.
pub fn dash_segments(points: &[(i32, i32)], pattern: &[i32]) -> Vec<Vec<(i32, i32)>> {
    if pattern.is_empty() || points.len() < 2 {
        return vec![points.to_vec()];
    }
    let mut out = Vec::new();
    let mut idx = 0usize;
    let mut left = pattern[0] as f64;
    let mut cur: Vec<(i32, i32)> = vec![points[0]];

    for pair in points.windows(2) {
        let (ax, ay) = (pair[0].0 as f64, pair[0].1 as f64);
        let (bx, by) = (pair[1].0 as f64, pair[1].1 as f64);
        let len = (bx - ax).hypot(by - ay);
        let mut pos = 0.0;
        while len - pos > left {
            pos += left;
            let t = pos / len;
            let p = (
                (ax + (bx - ax) * t).round() as i32,
                (ay + (by - ay) * t).round() as i32,
            );
            if idx % 2 == 0 {
                cur.push(p);
                out.push(std::mem::take(&mut cur));
            } else {
                cur = vec![p];
            }
            idx = (idx + 1) % pattern.len();
            left = pattern[idx] as f64;
        }
        left -= len - pos;
        if idx % 2 == 0 {
            cur.push(pair[1]);
        }
    }
    if idx % 2 == 0 && cur.len() > 1 {
        out.push(cur);
    }
    out
}

/// Triangle of an arrow head whose tip is at `tip`, pointing away from `from`.
pub fn arrow_head(from: (i32, i32), tip: (i32, i32), size: f64) -> Vec<(i32, i32)> {
    let (dx, dy) = ((tip.0 - from.0) as f64, (tip.1 - from.1) as f64);
    let len = dx.hypot(dy);
    if len < f64::EPSILON {
        return Vec::new();
    }
    let (ux, uy) = (dx / len, dy / len);
    let base = (tip.0 as f64 - ux * size, tip.1 as f64 - uy * size);
    let half = size * 0.5;
    vec![
        tip,
        ((base.0 - uy * half).round() as i32, (base.1 + ux * half).round() as i32),
        ((base.0 + uy * half).round() as i32, (base.1 - ux * half).round() as i32),
    ]
}

/// Shorten the segment `a→b` by `frac` of its length at both ends and by a
/// further `gap` pixels.
pub fn shrink_segment(
    a: (i32, i32),
    b: (i32, i32),
    frac: f64,
    gap: f64,
) -> Option<((i32, i32), (i32, i32))> {
    let (dx, dy) = ((b.0 - a.0) as f64, (b.1 - a.1) as f64);
    let len = dx.hypot(dy);
    let cut = len * frac + gap;
    if len <= 2.0 * cut {
        return None;
    }
    let (ux, uy) = (dx / len, dy / len);
    let at = |p: (i32, i32), d: f64| {
        (
            (p.0 as f64 + ux * d).round() as i32,
            (p.1 as f64 + uy * d).round() as i32,
        )
    };
    Some((at(a, cut), at(b, -cut)))
}

/// Outline of a pie wedge of radius 1 around the origin, in data space.
pub fn wedge_outline(start_deg: f64, end_deg: f64) -> Vec<(f64, f64)> {
    let steps = ((end_deg - start_deg).abs().ceil() as usize).max(2);
    let mut pts = vec![(0.0, 0.0)];
    pts.extend((0..=steps).map(|k| {
        polar(1.0, start_deg + (end_deg - start_deg) * k as f64 / steps as f64)
    }));
    pts
}

/// Candidate legend anchors in the order they are tried for `best`.
pub const BEST_CANDIDATES: [LegendLocation; 10] = [
    LegendLocation::UpperRight,
    LegendLocation::UpperLeft,
    LegendLocation::LowerLeft,
    LegendLocation::LowerRight,
    LegendLocation::Right,
    LegendLocation::CenterLeft,
    LegendLocation::CenterRight,
    LegendLocation::LowerCenter,
    LegendLocation::UpperCenter,
    LegendLocation::Center,
];

const LEGEND_INSET: i32 = 8;

/// Top-left corner of a `w`×`h` box placed at `loc` inside `proj`'s rectangle.
/// `Best` is resolved by [`best_location`] before calling this.
pub fn legend_origin(proj: &Projection, loc: LegendLocation, w: i32, h: i32) -> (i32, i32) {
    let left = proj.left + LEGEND_INSET;
    let right = proj.right - LEGEND_INSET - w;
    let hcenter = proj.left + (proj.width() - w) / 2;
    let top = proj.top + LEGEND_INSET;
    let bottom = proj.bottom - LEGEND_INSET - h;
    let vcenter = proj.top + (proj.height() - h) / 2;
    match loc {
        LegendLocation::Best | LegendLocation::UpperRight => (right, top),
        LegendLocation::UpperLeft => (left, top),
        LegendLocation::LowerLeft => (left, bottom),
        LegendLocation::LowerRight => (right, bottom),
        LegendLocation::Right | LegendLocation::CenterRight => (right, vcenter),
        LegendLocation::CenterLeft => (left, vcenter),
        LegendLocation::LowerCenter => (hcenter, bottom),
        LegendLocation::UpperCenter => (hcenter, top),
        LegendLocation::Center => (hcenter, vcenter),
    }
}

/// The candidate location whose box covers the fewest data points; ties go
/// to the earlier candidate.
pub fn best_location(proj: &Projection, w: i32, h: i32, points: &[(i32, i32)]) -> LegendLocation {
    BEST_CANDIDATES
        .iter()
        .copied()
        .min_by_key(|loc| {
            let (x, y) = legend_origin(proj, *loc, w, h);
            points
                .iter()
                .filter(|p| p.0 >= x && p.0 <= x + w && p.1 >= y && p.1 <= y + h)
                .count()
        })
        .unwrap_or(LegendLocation::UpperRight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proj() -> Projection {
        Projection {
            x: (0.0, 10.0),
            y: (0.0, 10.0),
            left: 100,
            top: 0,
            right: 200,
            bottom: 100,
        }
    }

    #[test]
    fn maps_corners_and_flips_y() {
        let p = proj();
        assert_eq!(p.map((0.0, 0.0)), (100, 100));
        assert_eq!(p.map((10.0, 10.0)), (200, 0));
        assert_eq!(p.map((5.0, 5.0)), (150, 50));
    }

    #[test]
    fn clips_segments_to_ranges() {
        let p = proj();
        let (a, b) = p.clip_segment((-5.0, 5.0), (15.0, 5.0)).unwrap();
        assert_eq!(a, (0.0, 5.0));
        assert_eq!(b, (10.0, 5.0));
        assert!(p.clip_segment((-5.0, -5.0), (-1.0, 20.0)).is_none());
        assert_eq!(p.clip_polyline(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]).len(), 1);
        assert_eq!(
            p.clip_polyline(&[(1.0, 1.0), (2.0, 20.0), (3.0, 3.0)]).len(),
            2
        );
    }

    #[test]
    fn descending_ranges_flip_the_axes() {
        let p = Projection {
            x: (10.0, 0.0),
            y: (10.0, 0.0),
            ..proj()
        };
        assert_eq!(p.map((0.0, 0.0)), (200, 0));
        assert_eq!(p.map((10.0, 10.0)), (100, 100));
        assert!(p.contains((2.0, 8.0)));
        assert!(!p.contains((11.0, 5.0)));
        let (a, b) = p.clip_segment((-5.0, 5.0), (15.0, 5.0)).unwrap();
        assert_eq!((a, b), ((0.0, 5.0), (10.0, 5.0)));
        assert_eq!(p.clip_rect(2.0, 4.0, 0.0, 5.0), Some([(160, 0), (180, 50)]));
    }

    #[test]
    fn dashes_alternate_on_and_off() {
        let runs = dash_segments(&[(0, 0), (20, 0)], &[5, 5]);
        assert_eq!(runs, vec![vec![(0, 0), (5, 0)], vec![(10, 0), (15, 0)]]);
        let solid = dash_segments(&[(0, 0), (20, 0)], &[]);
        assert_eq!(solid, vec![vec![(0, 0), (20, 0)]]);
    }

    #[test]
    fn best_legend_avoids_data() {
        let p = proj();
        // Points crowd the upper right corner.
        let pts: Vec<(i32, i32)> = (0..20).map(|i| (190 - i, 10 + i / 2)).collect();
        assert_ne!(best_location(&p, 30, 20, &pts), LegendLocation::UpperRight);
        assert_eq!(best_location(&p, 30, 20, &[]), LegendLocation::UpperRight);
    }

    #[test]
    fn arrow_head_tip_is_first_vertex() {
        let head = arrow_head((0, 0), (10, 0), 4.0);
        assert_eq!(head[0], (10, 0));
        assert_eq!(head[1].0, 6);
        assert!(shrink_segment((0, 0), (2, 0), 0.0, 2.0).is_none());
    }
}
