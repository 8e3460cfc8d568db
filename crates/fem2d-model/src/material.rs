//! Isotropic plane-stress material.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Isotropic elastic material for a thin flat part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub youngs_modulus: f64,
    pub poissons_ratio: f64,
    pub thickness: f64,
}

impl Material {
    pub fn new(youngs_modulus: f64, poissons_ratio: f64, thickness: f64) -> Self {
        Self {
            youngs_modulus,
            poissons_ratio,
            thickness,
        }
    }

    /// Plane-stress constitutive matrix
    /// `D = E/(1-ν²) · [1 ν 0; ν 1 0; 0 0 (1-ν)/2]`.
    pub fn plane_stress_matrix(&self) -> Matrix3<f64> {
        let e = self.youngs_modulus;
        let nu = self.poissons_ratio;
        let factor = e / (1.0 - nu * nu);
        Matrix3::new(
            factor,
            factor * nu,
            0.0,
            factor * nu,
            factor,
            0.0,
            0.0,
            0.0,
            factor * (1.0 - nu) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn plane_stress_matrix_entries() {
        let material = Material::new(30000.0, 0.25, 10.0);
        let d = material.plane_stress_matrix();
        let factor = 30000.0 / (1.0 - 0.0625);

        assert_relative_eq!(d[(0, 0)], factor);
        assert_relative_eq!(d[(1, 1)], factor);
        assert_relative_eq!(d[(0, 1)], factor * 0.25);
        assert_relative_eq!(d[(1, 0)], factor * 0.25);
        assert_relative_eq!(d[(2, 2)], factor * 0.375);
        assert_relative_eq!(d[(0, 2)], 0.0);
    }
}
