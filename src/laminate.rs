//! Laminate CLT engine - ABD assembly, engineering constants, polar sweep

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{LaminateError, LaminateResult};
use crate::material::{Invariants, Material};
use crate::{Mat3, Mat6};

/// Default ply thickness in meters (typical cured prepreg ply)
pub const DEFAULT_PLY_THICKNESS: f64 = 1.25e-4;

/// Maximum number of plies accepted in an input stack
pub const MAX_STACK_LEN: usize = 200;

/// Equivalent in-plane engineering constants of a laminate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaminateProperties {
    /// Effective Young's modulus in x (Pa)
    #[serde(rename = "Ex")]
    pub ex: f64,
    /// Effective Young's modulus in y (Pa)
    #[serde(rename = "Ey")]
    pub ey: f64,
    /// Effective shear modulus (Pa)
    #[serde(rename = "Gxy")]
    pub gxy: f64,
    /// Effective major Poisson's ratio
    pub vxy: f64,
}

/// One sample of the directional stiffness sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarPoint {
    /// Rotation angle in degrees
    pub angle: f64,
    #[serde(rename = "Ex")]
    pub ex: f64,
    #[serde(rename = "Ey")]
    pub ey: f64,
    #[serde(rename = "Gxy")]
    pub gxy: f64,
}

/// A stack of oriented orthotropic plies.
///
/// Owns a shared read-only [`Material`] and the ordered ply-angle sequence.
/// The A/B/D sub-matrices, the 6x6 ABD matrix and its inverse (compliance)
/// are assembled at construction; the laminate is immutable afterwards, so
/// any change to the ply layout requires building a new `Laminate`.
#[derive(Debug, Clone)]
pub struct Laminate {
    material: Arc<Material>,
    stack: Vec<f64>,
    ply_thickness: f64,
    total_thickness: f64,
    z_coords: Vec<f64>,
    a: Mat3,
    b: Mat3,
    d: Mat3,
    abd: Mat6,
    compliance: Mat6,
}

impl Laminate {
    /// Create a laminate from a ply-angle stack.
    ///
    /// # Arguments
    /// * `material` - Shared ply material
    /// * `stack` - Ply angles in degrees, outer face first (1-200 entries)
    /// * `ply_thickness` - Thickness of a single ply (m)
    /// * `symmetry` - If true, the effective stack is `stack` followed by
    ///   its reverse
    pub fn new(
        material: Arc<Material>,
        stack: &[f64],
        ply_thickness: f64,
        symmetry: bool,
    ) -> LaminateResult<Self> {
        if stack.is_empty() {
            return Err(LaminateError::InvalidStack(
                "stack must contain at least one ply".to_string(),
            ));
        }
        if stack.len() > MAX_STACK_LEN {
            return Err(LaminateError::InvalidStack(format!(
                "stack has {} plies, maximum is {MAX_STACK_LEN}",
                stack.len()
            )));
        }
        if stack.iter().any(|angle| !angle.is_finite()) {
            return Err(LaminateError::InvalidStack(
                "ply angles must be finite".to_string(),
            ));
        }
        if !(ply_thickness > 0.0 && ply_thickness.is_finite()) {
            return Err(LaminateError::InvalidThickness(ply_thickness));
        }

        let mut effective: Vec<f64> = stack.to_vec();
        if symmetry {
            effective.extend(stack.iter().rev());
        }

        let n = effective.len();
        let total_thickness = n as f64 * ply_thickness;

        // Interface z-coordinates, evenly spaced over [-h/2, h/2]
        let z_coords: Vec<f64> = (0..=n)
            .map(|k| -total_thickness / 2.0 + k as f64 * ply_thickness)
            .collect();

        let mut a = Mat3::zeros();
        let mut b = Mat3::zeros();
        let mut d = Mat3::zeros();

        for (k, &angle) in effective.iter().enumerate() {
            let q_bar = transformed_stiffness(material.invariants(), angle.to_radians());
            let z0 = z_coords[k];
            let z1 = z_coords[k + 1];

            a += q_bar * (z1 - z0);
            b += q_bar * (0.5 * (z1 * z1 - z0 * z0));
            d += q_bar * ((z1.powi(3) - z0.powi(3)) / 3.0);
        }

        let abd = assemble_abd(&a, &b, &d);
        let compliance = invert_abd(&abd);

        Ok(Self {
            material,
            stack: effective,
            ply_thickness,
            total_thickness,
            z_coords,
            a,
            b,
            d,
            abd,
            compliance,
        })
    }

    /// Create a laminate with the default ply thickness
    pub fn with_default_thickness(
        material: Arc<Material>,
        stack: &[f64],
        symmetry: bool,
    ) -> LaminateResult<Self> {
        Self::new(material, stack, DEFAULT_PLY_THICKNESS, symmetry)
    }

    /// Equivalent engineering constants from the membrane block of the
    /// compliance matrix. Degenerate (singular-ABD) laminates report zeros.
    pub fn properties(&self) -> LaminateProperties {
        engineering_constants(&self.compliance, self.total_thickness)
    }

    /// Directional stiffness sweep over angles 0, step, 2*step, ... < 360.
    ///
    /// Rotates the already-assembled A/B/D blocks per angle and re-inverts,
    /// which matches rebuilding the laminate with every ply angle shifted
    /// (to floating tolerance) at a fraction of the cost. At angle 0 the
    /// result equals [`Laminate::properties`] exactly.
    pub fn polar_stiffness(&self, step: f64) -> LaminateResult<Vec<PolarPoint>> {
        if !(step > 0.0 && step.is_finite()) {
            return Err(LaminateError::InvalidInput(format!(
                "polar step must be positive, got {step}"
            )));
        }

        let mut results = Vec::new();
        let mut angle = 0.0_f64;
        while angle < 360.0 {
            let phi = angle.to_radians();
            let a = rotate_stiffness(&self.a, phi);
            let b = rotate_stiffness(&self.b, phi);
            let d = rotate_stiffness(&self.d, phi);

            let abd = assemble_abd(&a, &b, &d);
            let compliance = invert_abd(&abd);
            let props = engineering_constants(&compliance, self.total_thickness);

            results.push(PolarPoint {
                angle,
                ex: props.ex,
                ey: props.ey,
                gxy: props.gxy,
            });
            angle += step;
        }

        Ok(results)
    }

    /// Shared ply material
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Effective ply-angle stack in degrees (mirrored when symmetric)
    pub fn stack(&self) -> &[f64] {
        &self.stack
    }

    /// Thickness of a single ply (m)
    pub fn ply_thickness(&self) -> f64 {
        self.ply_thickness
    }

    /// Total laminate thickness (m)
    pub fn total_thickness(&self) -> f64 {
        self.total_thickness
    }

    /// Ply interface z-coordinates, ply_count + 1 values over [-h/2, h/2]
    pub fn z_coords(&self) -> &[f64] {
        &self.z_coords
    }

    /// Membrane stiffness sub-matrix A
    pub fn a(&self) -> &Mat3 {
        &self.a
    }

    /// Membrane-bending coupling sub-matrix B
    pub fn b(&self) -> &Mat3 {
        &self.b
    }

    /// Bending stiffness sub-matrix D
    pub fn d(&self) -> &Mat3 {
        &self.d
    }

    /// 6x6 ABD stiffness matrix
    pub fn abd(&self) -> &Mat6 {
        &self.abd
    }

    /// 6x6 compliance matrix (inverse of ABD; zero when ABD is singular)
    pub fn compliance(&self) -> &Mat6 {
        &self.compliance
    }
}

/// Transformed ply stiffness Q-bar at angle theta (radians), via the
/// Tsai-Pagano double-angle invariant formulas.
pub(crate) fn transformed_stiffness(u: &Invariants, theta: f64) -> Mat3 {
    let c2 = (2.0 * theta).cos();
    let s2 = (2.0 * theta).sin();
    let c4 = (4.0 * theta).cos();
    let s4 = (4.0 * theta).sin();

    let q11 = u.u1 + u.u2 * c2 + u.u3 * c4;
    let q22 = u.u1 - u.u2 * c2 + u.u3 * c4;
    let q12 = u.u4 - u.u3 * c4;
    let q16 = 0.5 * u.u2 * s2 + u.u3 * s4;
    let q26 = 0.5 * u.u2 * s2 - u.u3 * s4;
    let q66 = u.u5 - u.u3 * c4;

    Mat3::new(
        q11, q12, q16, //
        q12, q22, q26, //
        q16, q26, q66,
    )
}

/// Strain transformation matrix (global -> local, engineering shear)
pub(crate) fn strain_transform(theta: f64) -> Mat3 {
    let c = theta.cos();
    let s = theta.sin();
    let c2 = c * c;
    let s2 = s * s;
    let cs = c * s;

    Mat3::new(
        c2,
        s2,
        cs,
        s2,
        c2,
        -cs,
        -2.0 * cs,
        2.0 * cs,
        c2 - s2,
    )
}

/// Stress transformation matrix (global -> local)
fn stress_transform(theta: f64) -> Mat3 {
    let c = theta.cos();
    let s = theta.sin();
    let c2 = c * c;
    let s2 = s * s;
    let cs = c * s;

    Mat3::new(
        c2,
        s2,
        2.0 * cs,
        s2,
        c2,
        -2.0 * cs,
        -cs,
        cs,
        c2 - s2,
    )
}

/// Rotate a Voigt stiffness-like matrix so that every constituent ply angle
/// shifts by `phi`. For any theta this maps Q-bar(theta) to
/// Q-bar(theta + phi), and A/B/D are sums of Q-bars, so the same map rotates
/// the assembled blocks.
fn rotate_stiffness(m: &Mat3, phi: f64) -> Mat3 {
    stress_transform(-phi) * m * strain_transform(phi)
}

fn assemble_abd(a: &Mat3, b: &Mat3, d: &Mat3) -> Mat6 {
    let mut abd = Mat6::zeros();
    abd.fixed_view_mut::<3, 3>(0, 0).copy_from(a);
    abd.fixed_view_mut::<3, 3>(0, 3).copy_from(b);
    abd.fixed_view_mut::<3, 3>(3, 0).copy_from(b);
    abd.fixed_view_mut::<3, 3>(3, 3).copy_from(d);
    abd
}

/// Invert the ABD matrix. A singular ABD (degenerate layup) is not fatal:
/// the compliance degrades to zero and downstream engineering constants
/// report zero instead of NaN/infinity.
fn invert_abd(abd: &Mat6) -> Mat6 {
    abd.try_inverse().unwrap_or_else(|| {
        log::warn!("singular ABD matrix, substituting zero compliance");
        Mat6::zeros()
    })
}

fn engineering_constants(compliance: &Mat6, h: f64) -> LaminateProperties {
    let a00 = compliance[(0, 0)];
    let a01 = compliance[(0, 1)];
    let a11 = compliance[(1, 1)];
    let a22 = compliance[(2, 2)];

    let guard = |den: f64, value: f64| if den != 0.0 { value } else { 0.0 };

    LaminateProperties {
        ex: guard(h * a00, 1.0 / (h * a00)),
        ey: guard(h * a11, 1.0 / (h * a11)),
        gxy: guard(h * a22, 1.0 / (h * a22)),
        vxy: guard(a00, -a01 / a00),
    }
}
