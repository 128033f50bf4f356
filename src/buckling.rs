//! Critical buckling load for simply-supported rectangular plates

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::laminate::Laminate;

/// Default highest half-wave mode number checked
pub const DEFAULT_MODE_COUNT: usize = 5;

/// Minimum critical buckling load and its half-wave mode number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucklingResult {
    /// Critical in-plane load N_cr (N/m)
    pub load: f64,
    /// Half-wave mode number m in the loaded direction
    pub mode: usize,
}

/// Critical buckling load of a simply-supported rectangular orthotropic
/// plate under uniaxial in-plane compression.
///
/// Evaluates the closed-form Kirchhoff expression for half-wave mode numbers
/// m = 1..=m_max using the laminate bending sub-matrix D and returns the
/// minimum. A discrete search is enough here; the minimizing mode is always
/// within a few half-waves for practical aspect ratios.
///
/// # Arguments
/// * `a` - Plate length in the loaded x-direction (m)
/// * `b` - Plate width (m)
/// * `m_max` - Highest mode number to check (use [`DEFAULT_MODE_COUNT`])
pub fn critical_load(laminate: &Laminate, a: f64, b: f64, m_max: usize) -> BucklingResult {
    let d = laminate.d();
    let d11 = d[(0, 0)];
    let d12 = d[(0, 1)];
    let d22 = d[(1, 1)];
    let d66 = d[(2, 2)];

    let mut best = BucklingResult {
        load: f64::INFINITY,
        mode: 1,
    };

    for m in 1..=m_max.max(1) {
        let mf = m as f64;
        let term1 = d11 * (mf * b / a).powi(2);
        let term2 = 2.0 * (d12 + 2.0 * d66);
        let term3 = d22 * (a / (mf * b)).powi(2);

        let n = (PI * PI / (b * b)) * (term1 + term2 + term3);

        if n < best.load {
            best = BucklingResult { load: n, mode: m };
        }
    }

    best
}
