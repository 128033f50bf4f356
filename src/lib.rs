//! CLT Solver - A native Rust Classical Laminate Theory library
//!
//! This library computes the mechanical behavior of fiber-reinforced
//! composite laminates, supporting:
//! - ABD stiffness/compliance assembly and engineering constants
//! - Directional (polar) stiffness sweeps
//! - Failure envelopes (Tsai-Wu, Tsai-Hill, maximum stress)
//! - Plate buckling critical loads
//! - Genetic stacking-sequence optimization
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use clt_solver::prelude::*;
//!
//! // Carbon/epoxy quasi-isotropic laminate, [0/45/-45/90]s
//! let material = Arc::new(Material::carbon_epoxy());
//! let laminate = Laminate::with_default_thickness(
//!     material,
//!     &[0.0, 45.0, -45.0, 90.0],
//!     true,
//! ).unwrap();
//!
//! let props = laminate.properties();
//! assert!(props.ex > 0.0);
//!
//! // Failure envelope under swept in-plane loading
//! let limits = StrengthLimits::new(1500e6, 1200e6, 50e6, 250e6, Some(70e6)).unwrap();
//! let envelope = FailureCriterion::TsaiWu.envelope(&laminate, &limits, 72);
//! assert!(!envelope.points.is_empty());
//! ```

pub mod buckling;
pub mod error;
pub mod failure;
pub mod laminate;
pub mod material;
pub mod optimization;

use nalgebra::{Matrix3, Matrix6, Vector6};

/// 3x3 matrix for ply stiffness and A/B/D blocks
pub type Mat3 = Matrix3<f64>;
/// 6x6 matrix for the ABD stiffness and compliance
pub type Mat6 = Matrix6<f64>;
/// 6-element vector of force/moment resultants or strain/curvature
pub type Vec6 = Vector6<f64>;

// Re-export common types
pub mod prelude {
    pub use crate::buckling::{critical_load, BucklingResult, DEFAULT_MODE_COUNT};
    pub use crate::error::{LaminateError, LaminateResult};
    pub use crate::failure::{
        safety_factor, Envelope, FailureCriterion, InPlaneLoad, StrengthLimits,
        DEFAULT_ENVELOPE_POINTS,
    };
    pub use crate::laminate::{
        Laminate, LaminateProperties, PolarPoint, DEFAULT_PLY_THICKNESS, MAX_STACK_LEN,
    };
    pub use crate::material::{Invariants, Material};
    pub use crate::optimization::{
        BucklingConstraint, DesignConstraints, GeneticAlgorithm, StrengthConstraint, GENE_ANGLES,
    };
    pub use crate::{Mat3, Mat6, Vec6};
}
