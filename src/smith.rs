//! Smith chart geometry.
//!
//! Data points are one-port reflection coefficients Γ = real + i·imag drawn
//! directly on the unit disk. The grid consists of constant-resistance circles
//! and constant-reactance arcs of the normalized impedance z = (1 + Γ) / (1 − Γ).

use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Normalized resistance values drawn as grid circles.
pub const RESISTANCE_STEPS: [f64; 5] = [0.2, 0.5, 1.0, 2.0, 5.0];
/// Normalized reactance magnitudes drawn as grid arcs (both signs).
pub const REACTANCE_STEPS: [f64; 5] = [0.2, 0.5, 1.0, 2.0, 5.0];

const SEGMENTS: usize = 96;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn norm(&self) -> f64 {
        self.re.hypot(self.im)
    }
}

/// One sample of a reflection-coefficient trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Synthetic frequency index, starting at 1 and unit-spaced.
    pub frequency: usize,
    pub gamma: Complex,
}

/// Pair `real`/`imag` into Γ samples at frequency indices `1..=n`.
pub fn reflection_trace(real: &[f64], imag: &[f64]) -> Vec<Sample> {
    real.iter()
        .zip(imag)
        .enumerate()
        .map(|(i, (&re, &im))| Sample {
            frequency: i + 1,
            gamma: Complex::new(re, im),
        })
        .collect()
}

fn circle(cx: f64, cy: f64, r: f64, from: f64, sweep: f64, n: usize) -> Vec<(f64, f64)> {
    (0..=n)
        .map(|k| {
            let a = from + sweep * k as f64 / n as f64;
            (cx + r * a.cos(), cy + r * a.sin())
        })
        .collect()
}

/// The outer boundary |Γ| = 1 (resistance 0).
pub fn unit_circle() -> Vec<(f64, f64)> {
    circle(0.0, 0.0, 1.0, 0.0, TAU, SEGMENTS)
}

/// Constant-resistance circle for normalized resistance `r ≥ 0`.
pub fn resistance_circle(r: f64) -> Vec<(f64, f64)> {
    circle(r / (1.0 + r), 0.0, 1.0 / (1.0 + r), 0.0, TAU, SEGMENTS)
}

/// The part of the constant-reactance circle for `x ≠ 0` that lies inside the
/// unit disk, running from Γ = 1 to the boundary.
pub fn reactance_arc(x: f64) -> Vec<(f64, f64)> {
    let ax = x.abs();
    let (cx, cy, radius) = (1.0, 1.0 / ax, 1.0 / ax);
    // Boundary intersection (upper half-plane for positive reactance).
    let ix = (ax * ax - 1.0) / (ax * ax + 1.0);
    let iy = 2.0 * ax / (ax * ax + 1.0);

    let start = -FRAC_PI_2;
    let end = (iy - cy).atan2(ix - cx);
    let sweep = (start - end).rem_euclid(TAU);
    let arc = circle(cx, cy, radius, start, -sweep, SEGMENTS);
    if x < 0.0 {
        arc.into_iter().map(|(px, py)| (px, -py)).collect()
    } else {
        arc
    }
}

/// All grid polylines: unit circle, resistance circles, reactance arcs and the
/// real axis.
pub fn grid_lines() -> Vec<Vec<(f64, f64)>> {
    let mut lines = vec![unit_circle()];
    lines.extend(RESISTANCE_STEPS.iter().map(|&r| resistance_circle(r)));
    for &x in &REACTANCE_STEPS {
        lines.push(reactance_arc(x));
        lines.push(reactance_arc(-x));
    }
    lines.push(vec![(-1.0, 0.0), (1.0, 0.0)]);
    lines
}
