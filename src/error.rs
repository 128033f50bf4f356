//! Error types for the CLT solver

use thiserror::Error;

/// Main error type for laminate operations
#[derive(Error, Debug)]
pub enum LaminateError {
    #[error("Invalid material: {0}")]
    InvalidMaterial(String),

    #[error("Unstable material: v12 * v21 = {product} >= 1 (v12 = {v12}, v21 = {v21})")]
    UnstableMaterial { v12: f64, v21: f64, product: f64 },

    #[error("Invalid stack: {0}")]
    InvalidStack(String),

    #[error("Invalid ply thickness {0} - must be a positive, finite value")]
    InvalidThickness(f64),

    #[error("Invalid strength limits: {0}")]
    InvalidLimits(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for laminate operations
pub type LaminateResult<T> = Result<T, LaminateError>;
