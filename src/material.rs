//! Orthotropic ply material properties

use serde::{Deserialize, Serialize};

use crate::error::{LaminateError, LaminateResult};
use crate::Mat3;

/// Tsai-Pagano rotation invariants of the reduced stiffness matrix.
///
/// These let the transformed ply stiffness Q-bar be evaluated with two
/// double-angle terms instead of fourth powers of sine/cosine, and are
/// constant for a given material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Invariants {
    pub u1: f64,
    pub u2: f64,
    pub u3: f64,
    pub u4: f64,
    pub u5: f64,
}

impl Invariants {
    fn from_reduced_stiffness(q: &Mat3) -> Self {
        let q11 = q[(0, 0)];
        let q12 = q[(0, 1)];
        let q22 = q[(1, 1)];
        let q66 = q[(2, 2)];

        Self {
            u1: (3.0 * q11 + 3.0 * q22 + 2.0 * q12 + 4.0 * q66) / 8.0,
            u2: (q11 - q22) / 2.0,
            u3: (q11 + q22 - 2.0 * q12 - 4.0 * q66) / 8.0,
            u4: (q11 + q22 + 6.0 * q12 - 4.0 * q66) / 8.0,
            u5: (q11 + q22 - 2.0 * q12 + 4.0 * q66) / 8.0,
        }
    }
}

/// Orthotropic material for a unidirectional composite ply.
///
/// Immutable after construction: the reduced stiffness matrix and the
/// Tsai-Pagano invariants are computed once in `new` and reused for every
/// ply-angle transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MaterialParams", into = "MaterialParams")]
pub struct Material {
    e1: f64,
    e2: f64,
    g12: f64,
    v12: f64,
    v21: f64,
    rho: f64,
    name: String,
    invariants: Invariants,
}

/// Raw material input, as supplied by the external request layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialParams {
    #[serde(rename = "E1")]
    pub e1: f64,
    #[serde(rename = "E2")]
    pub e2: f64,
    #[serde(rename = "G12")]
    pub g12: f64,
    pub v12: f64,
    #[serde(default)]
    pub rho: f64,
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    "Material".to_string()
}

impl TryFrom<MaterialParams> for Material {
    type Error = LaminateError;

    fn try_from(p: MaterialParams) -> LaminateResult<Self> {
        Material::new(p.e1, p.e2, p.g12, p.v12, p.rho, &p.name)
    }
}

impl From<Material> for MaterialParams {
    fn from(m: Material) -> Self {
        Self {
            e1: m.e1,
            e2: m.e2,
            g12: m.g12,
            v12: m.v12,
            rho: m.rho,
            name: m.name,
        }
    }
}

impl Material {
    /// Create a new orthotropic material.
    ///
    /// # Arguments
    /// * `e1` - Longitudinal Young's modulus (Pa)
    /// * `e2` - Transverse Young's modulus (Pa)
    /// * `g12` - In-plane shear modulus (Pa)
    /// * `v12` - Major Poisson's ratio (v21 is derived as v12 * e2 / e1)
    /// * `rho` - Density (kg/m^3)
    /// * `name` - Material label
    ///
    /// Rejects non-positive moduli and any v12 for which v12 * v21 >= 1,
    /// since the reduced stiffness matrix is singular or non-physical there.
    pub fn new(
        e1: f64,
        e2: f64,
        g12: f64,
        v12: f64,
        rho: f64,
        name: &str,
    ) -> LaminateResult<Self> {
        if !(e1 > 0.0 && e1.is_finite()) {
            return Err(LaminateError::InvalidMaterial(format!(
                "E1 must be positive, got {e1}"
            )));
        }
        if !(e2 > 0.0 && e2.is_finite()) {
            return Err(LaminateError::InvalidMaterial(format!(
                "E2 must be positive, got {e2}"
            )));
        }
        if !(g12 > 0.0 && g12.is_finite()) {
            return Err(LaminateError::InvalidMaterial(format!(
                "G12 must be positive, got {g12}"
            )));
        }

        let v21 = v12 * e2 / e1;
        let product = v12 * v21;
        if product >= 1.0 || !product.is_finite() {
            return Err(LaminateError::UnstableMaterial { v12, v21, product });
        }

        Ok(Self::construct(e1, e2, g12, v12, rho, name))
    }

    // Constants are known-valid here; used by `new` after validation and by
    // the named presets.
    fn construct(e1: f64, e2: f64, g12: f64, v12: f64, rho: f64, name: &str) -> Self {
        let v21 = v12 * e2 / e1;
        let q = Self::reduced_stiffness(e1, e2, g12, v12, v21);
        Self {
            e1,
            e2,
            g12,
            v12,
            v21,
            rho,
            name: name.to_string(),
            invariants: Invariants::from_reduced_stiffness(&q),
        }
    }

    /// Standard carbon/epoxy ply properties
    pub fn carbon_epoxy() -> Self {
        Self::construct(140e9, 10e9, 5e9, 0.3, 1600.0, "Carbon/Epoxy")
    }

    /// Standard glass/epoxy ply properties
    pub fn glass_epoxy() -> Self {
        Self::construct(43e9, 10e9, 4.5e9, 0.29, 2000.0, "Glass/Epoxy")
    }

    fn reduced_stiffness(e1: f64, e2: f64, g12: f64, v12: f64, v21: f64) -> Mat3 {
        let denom = 1.0 - v12 * v21;
        let q11 = e1 / denom;
        let q22 = e2 / denom;
        let q12 = v12 * e2 / denom;
        let q66 = g12;

        Mat3::new(
            q11, q12, 0.0, //
            q12, q22, 0.0, //
            0.0, 0.0, q66,
        )
    }

    /// Reduced (plane-stress) stiffness matrix Q in material axes
    pub fn q(&self) -> Mat3 {
        Self::reduced_stiffness(self.e1, self.e2, self.g12, self.v12, self.v21)
    }

    /// Cached Tsai-Pagano invariants (U1..U5)
    pub fn invariants(&self) -> &Invariants {
        &self.invariants
    }

    /// Longitudinal Young's modulus (Pa)
    pub fn e1(&self) -> f64 {
        self.e1
    }

    /// Transverse Young's modulus (Pa)
    pub fn e2(&self) -> f64 {
        self.e2
    }

    /// In-plane shear modulus (Pa)
    pub fn g12(&self) -> f64 {
        self.g12
    }

    /// Major Poisson's ratio
    pub fn v12(&self) -> f64 {
        self.v12
    }

    /// Minor Poisson's ratio, v12 * E2 / E1
    pub fn v21(&self) -> f64 {
        self.v21
    }

    /// Density (kg/m^3)
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Material label
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reduced_stiffness_entries() {
        let mat = Material::carbon_epoxy();
        let q = mat.q();

        let denom = 1.0 - mat.v12() * mat.v21();
        assert_relative_eq!(q[(0, 0)], 140e9 / denom, max_relative = 1e-12);
        assert_relative_eq!(q[(2, 2)], 5e9, max_relative = 1e-12);
        assert_eq!(q[(0, 2)], 0.0);
        assert_eq!(q[(1, 2)], 0.0);
    }

    #[test]
    fn invariants_recombine_to_stiffness() {
        // At 0 degrees the double-angle expansion must give back Q itself.
        let mat = Material::glass_epoxy();
        let q = mat.q();
        let u = mat.invariants();

        assert_relative_eq!(u.u1 + u.u2 + u.u3, q[(0, 0)], max_relative = 1e-12);
        assert_relative_eq!(u.u1 - u.u2 + u.u3, q[(1, 1)], max_relative = 1e-12);
        assert_relative_eq!(u.u4 - u.u3, q[(0, 1)], max_relative = 1e-12);
        assert_relative_eq!(u.u5 - u.u3, q[(2, 2)], max_relative = 1e-12);
    }

    #[test]
    fn rejects_non_positive_moduli() {
        assert!(Material::new(0.0, 10e9, 5e9, 0.3, 1600.0, "bad").is_err());
        assert!(Material::new(140e9, -10e9, 5e9, 0.3, 1600.0, "bad").is_err());
        assert!(Material::new(140e9, 10e9, 0.0, 0.3, 1600.0, "bad").is_err());
    }

    #[test]
    fn rejects_unstable_poisson_ratio() {
        // v21 = v12 * E2 / E1 = v12 here, so v12 = 1.0 gives v12 * v21 = 1.
        let result = Material::new(10e9, 10e9, 5e9, 1.0, 1600.0, "bad");
        assert!(matches!(
            result,
            Err(LaminateError::UnstableMaterial { .. })
        ));
    }

    #[test]
    fn deserialization_revalidates() {
        let ok: Result<Material, _> = serde_json::from_str(
            r#"{"E1": 140e9, "E2": 10e9, "G12": 5e9, "v12": 0.3, "name": "CFRP"}"#,
        );
        assert_eq!(ok.unwrap().name(), "CFRP");

        let bad: Result<Material, _> =
            serde_json::from_str(r#"{"E1": -1.0, "E2": 10e9, "G12": 5e9, "v12": 0.3}"#);
        assert!(bad.is_err());
    }
}
