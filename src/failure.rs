//! First-ply failure criteria, envelopes, and safety factors

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{LaminateError, LaminateResult};
use crate::laminate::{strain_transform, Laminate};
use crate::Vec6;

/// Number of load directions sampled per envelope by default
pub const DEFAULT_ENVELOPE_POINTS: usize = 72;

// Below this the Tsai-Wu quadratic coefficient is treated as zero and the
// equation degenerates to a linear one.
const QUADRATIC_EPS: f64 = 1e-10;

/// In-plane force resultants (N/m)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InPlaneLoad {
    #[serde(rename = "Nx", default)]
    pub nx: f64,
    #[serde(rename = "Ny", default)]
    pub ny: f64,
    #[serde(rename = "Nxy", default)]
    pub nxy: f64,
}

impl InPlaneLoad {
    pub fn new(nx: f64, ny: f64, nxy: f64) -> Self {
        Self { nx, ny, nxy }
    }
}

/// Ply strength limits (all positive, Pa).
///
/// Compressive limits are magnitudes. The shear limit is optional and
/// defaults to `xt / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LimitsParams", into = "LimitsParams")]
pub struct StrengthLimits {
    xt: f64,
    xc: f64,
    yt: f64,
    yc: f64,
    s: Option<f64>,
}

/// Raw strength-limit input, as supplied by the external request layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimitsParams {
    pub xt: f64,
    pub xc: f64,
    pub yt: f64,
    pub yc: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<f64>,
}

impl TryFrom<LimitsParams> for StrengthLimits {
    type Error = LaminateError;

    fn try_from(p: LimitsParams) -> LaminateResult<Self> {
        StrengthLimits::new(p.xt, p.xc, p.yt, p.yc, p.s)
    }
}

impl From<StrengthLimits> for LimitsParams {
    fn from(l: StrengthLimits) -> Self {
        Self {
            xt: l.xt,
            xc: l.xc,
            yt: l.yt,
            yc: l.yc,
            s: l.s,
        }
    }
}

impl StrengthLimits {
    /// Create strength limits, rejecting non-positive values.
    pub fn new(xt: f64, xc: f64, yt: f64, yc: f64, s: Option<f64>) -> LaminateResult<Self> {
        for (label, value) in [
            ("xt", xt),
            ("xc", xc),
            ("yt", yt),
            ("yc", yc),
            ("s", s.unwrap_or(xt)),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(LaminateError::InvalidLimits(format!(
                    "{label} must be positive, got {value}"
                )));
            }
        }

        Ok(Self { xt, xc, yt, yc, s })
    }

    /// Longitudinal tensile strength (Pa)
    pub fn xt(&self) -> f64 {
        self.xt
    }

    /// Longitudinal compressive strength (Pa)
    pub fn xc(&self) -> f64 {
        self.xc
    }

    /// Transverse tensile strength (Pa)
    pub fn yt(&self) -> f64 {
        self.yt
    }

    /// Transverse compressive strength (Pa)
    pub fn yc(&self) -> f64 {
        self.yc
    }

    /// In-plane shear strength, defaulting to xt / 2
    pub fn shear(&self) -> f64 {
        self.s.unwrap_or(self.xt / 2.0)
    }
}

/// A closed 2D failure curve: ultimate (stress_x, stress_y) pairs per
/// sampled load direction. Directions with no finite positive failure
/// multiplier are dropped, so the curve may hold fewer points than were
/// sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub points: Vec<(f64, f64)>,
}

impl Envelope {
    /// Points with the first one repeated at the end, for plotting a closed
    /// loop. Presentation helper only; `points` is the numeric contract.
    pub fn closed_points(&self) -> Vec<(f64, f64)> {
        let mut closed = self.points.clone();
        if let Some(&first) = closed.first() {
            closed.push(first);
        }
        closed
    }
}

/// First-ply failure criterion for envelope generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCriterion {
    TsaiWu,
    TsaiHill,
    MaxStress,
}

impl FailureCriterion {
    /// Compute the failure envelope of a laminate.
    ///
    /// Samples `num_points` load directions evenly over [0, 2*pi). For each
    /// direction a unit in-plane resultant scaled by the total thickness is
    /// applied (no bending), mid-ply local stresses are computed per ply,
    /// and the smallest ply failure multiplier becomes the envelope radius
    /// for that direction (weakest-link policy).
    pub fn envelope(
        &self,
        laminate: &Laminate,
        limits: &StrengthLimits,
        num_points: usize,
    ) -> Envelope {
        let h = laminate.total_thickness();
        let tsai_wu = TsaiWuCoefficients::new(limits);

        let mut points = Vec::with_capacity(num_points);

        for i in 0..num_points {
            let theta = 2.0 * PI * i as f64 / num_points as f64;
            let sx_unit = theta.cos();
            let sy_unit = theta.sin();

            let load = InPlaneLoad::new(sx_unit * h, sy_unit * h, 0.0);
            let stresses = ply_stresses(laminate, &load);

            let mut factor = f64::INFINITY;
            for stress in &stresses {
                let f_ply = match self {
                    Self::TsaiWu => tsai_wu.positive_root(stress).unwrap_or(f64::INFINITY),
                    Self::TsaiHill => tsai_hill_factor(stress, limits),
                    Self::MaxStress => max_stress_factor(stress, limits),
                };
                factor = factor.min(f_ply);
            }

            if factor.is_finite() && factor > 0.0 {
                points.push((sx_unit * factor, sy_unit * factor));
            }
        }

        Envelope { points }
    }
}

/// Local mid-ply stress state (s1, s2, t12) in material axes
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlyStress {
    pub s1: f64,
    pub s2: f64,
    pub t12: f64,
}

/// Mid-ply local stresses for every ply under an in-plane load (no applied
/// moment): laminate compliance gives mid-plane strain and curvature, each
/// ply evaluates the global strain at its mid z and rotates it to material
/// axes.
pub(crate) fn ply_stresses(laminate: &Laminate, load: &InPlaneLoad) -> Vec<PlyStress> {
    let nm = Vec6::new(load.nx, load.ny, load.nxy, 0.0, 0.0, 0.0);
    let strain_curvature = laminate.compliance() * nm;

    let eps0 = strain_curvature.fixed_rows::<3>(0).into_owned();
    let kappa = strain_curvature.fixed_rows::<3>(3).into_owned();

    let q = laminate.material().q();
    let z = laminate.z_coords();

    laminate
        .stack()
        .iter()
        .enumerate()
        .map(|(k, &angle)| {
            let z_mid = 0.5 * (z[k] + z[k + 1]);
            let eps_global = eps0 + kappa * z_mid;
            let eps_local = strain_transform(angle.to_radians()) * eps_global;

            PlyStress {
                s1: q[(0, 0)] * eps_local[0] + q[(0, 1)] * eps_local[1],
                s2: q[(1, 0)] * eps_local[0] + q[(1, 1)] * eps_local[1],
                t12: q[(2, 2)] * eps_local[2],
            }
        })
        .collect()
}

/// Tsai-Wu interaction coefficients for a set of strength limits
#[derive(Debug, Clone, Copy)]
pub(crate) struct TsaiWuCoefficients {
    f1: f64,
    f2: f64,
    f11: f64,
    f22: f64,
    f66: f64,
    f12: f64,
}

impl TsaiWuCoefficients {
    pub fn new(limits: &StrengthLimits) -> Self {
        let (xt, xc) = (limits.xt(), limits.xc());
        let (yt, yc) = (limits.yt(), limits.yc());
        let s = limits.shear();

        let f11 = 1.0 / (xt * xc);
        let f22 = 1.0 / (yt * yc);

        Self {
            f1: 1.0 / xt - 1.0 / xc,
            f2: 1.0 / yt - 1.0 / yc,
            f11,
            f22,
            f66: 1.0 / (s * s),
            f12: -0.5 * (f11 * f22).sqrt(),
        }
    }

    /// Scale factor f such that f * stress sits on the Tsai-Wu surface:
    /// the smallest positive root of A*f^2 + B*f - 1 = 0, or None if the
    /// stress state never reaches the surface.
    pub fn positive_root(&self, stress: &PlyStress) -> Option<f64> {
        let PlyStress { s1, s2, t12 } = *stress;

        let a = self.f11 * s1 * s1
            + self.f22 * s2 * s2
            + self.f66 * t12 * t12
            + 2.0 * self.f12 * s1 * s2;
        let b = self.f1 * s1 + self.f2 * s2;

        if a.abs() < QUADRATIC_EPS {
            // Degenerates to B*f = 1
            return if b > 0.0 { Some(1.0 / b) } else { None };
        }

        let delta = b * b + 4.0 * a;
        if delta < 0.0 {
            return None;
        }

        // With a > 0 only one root is positive; with a < 0 both can be, and
        // the first candidate is then the smaller (conservative) one.
        let sqrt_delta = delta.sqrt();
        let r1 = (-b + sqrt_delta) / (2.0 * a);
        let r2 = (-b - sqrt_delta) / (2.0 * a);

        if r1 > 0.0 {
            Some(r1)
        } else if r2 > 0.0 {
            Some(r2)
        } else {
            None
        }
    }
}

fn tsai_hill_factor(stress: &PlyStress, limits: &StrengthLimits) -> f64 {
    let PlyStress { s1, s2, t12 } = *stress;

    let x = if s1 >= 0.0 { limits.xt() } else { limits.xc() };
    let y = if s2 >= 0.0 { limits.yt() } else { limits.yc() };
    let s = limits.shear();

    let term = (s1 / x).powi(2) - s1 * s2 / (x * x) + (s2 / y).powi(2) + (t12 / s).powi(2);

    if term > 0.0 {
        (1.0 / term).sqrt()
    } else {
        f64::INFINITY
    }
}

fn max_stress_factor(stress: &PlyStress, limits: &StrengthLimits) -> f64 {
    let PlyStress { s1, s2, t12 } = *stress;

    let f_s1 = if s1 > 0.0 {
        limits.xt() / s1
    } else if s1 < 0.0 {
        -limits.xc() / s1
    } else {
        f64::INFINITY
    };

    let f_s2 = if s2 > 0.0 {
        limits.yt() / s2
    } else if s2 < 0.0 {
        -limits.yc() / s2
    } else {
        f64::INFINITY
    };

    let f_t12 = if t12 != 0.0 {
        limits.shear() / t12.abs()
    } else {
        f64::INFINITY
    };

    f_s1.min(f_s2).min(f_t12)
}

/// Minimum Tsai-Wu safety factor of a laminate under a fixed in-plane load.
///
/// Solves the same quadratic as the envelope generator, but against the
/// applied load instead of a swept unit direction; the weakest ply governs.
/// Returns infinity when no ply constrains the load (e.g. a zero load).
pub fn safety_factor(laminate: &Laminate, load: &InPlaneLoad, limits: &StrengthLimits) -> f64 {
    let tsai_wu = TsaiWuCoefficients::new(limits);

    ply_stresses(laminate, load)
        .iter()
        .filter_map(|stress| tsai_wu.positive_root(stress))
        .fold(f64::INFINITY, f64::min)
}
