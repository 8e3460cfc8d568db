//! Constant-strain triangle element.

use crate::material::Material;
use fem2d_geom::Point2;
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

/// Strain-displacement matrix, 3 strain components by 6 local DOFs.
pub type BMatrix = SMatrix<f64, 3, 6>;
/// Local element stiffness.
pub type ElementStiffness = SMatrix<f64, 6, 6>;

/// Directed element edge; reversed pairs cancel during boundary
/// extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementEdge {
    pub v1: usize,
    pub v2: usize,
}

impl ElementEdge {
    pub fn new(v1: usize, v2: usize) -> Self {
        Self { v1, v2 }
    }

    pub fn reversed(&self) -> Self {
        Self {
            v1: self.v2,
            v2: self.v1,
        }
    }
}

/// Linear triangle referencing three node indices. The strain,
/// material and stiffness matrices are cached on first assembly; the
/// recovered stress vector is written during stress recovery.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub nodes: [usize; 3],
    pub b: Option<BMatrix>,
    pub d: Option<Matrix3<f64>>,
    pub stiffness: Option<ElementStiffness>,
    pub stress: Option<Vector3<f64>>,
}

impl Element {
    pub fn new(n1: usize, n2: usize, n3: usize) -> Self {
        Self {
            nodes: [n1, n2, n3],
            b: None,
            d: None,
            stiffness: None,
            stress: None,
        }
    }

    /// Signed area of the triangle spanned by `coords`; positive for
    /// counter-clockwise vertex order.
    pub fn signed_area(coords: &[Point2; 3]) -> f64 {
        let [p1, p2, p3] = coords;
        (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y)) / 2.0
    }

    /// Computes and caches `B`, `D` and the local stiffness
    /// `K = t · A · Bᵀ · D · B` for the given vertex coordinates.
    pub fn compute_stiffness(
        &mut self,
        coords: &[Point2; 3],
        material: &Material,
    ) -> &ElementStiffness {
        let [p1, p2, p3] = coords;
        let area = Self::signed_area(coords);
        let scale = 1.0 / (2.0 * area);

        let y23 = p2.y - p3.y;
        let y31 = p3.y - p1.y;
        let y12 = p1.y - p2.y;
        let x32 = p3.x - p2.x;
        let x13 = p1.x - p3.x;
        let x21 = p2.x - p1.x;

        #[rustfmt::skip]
        let b = BMatrix::from_row_slice(&[
            y23, 0.0, y31, 0.0, y12, 0.0,
            0.0, x32, 0.0, x13, 0.0, x21,
            x32, y23, x13, y31, x21, y12,
        ]) * scale;

        let d = material.plane_stress_matrix();
        let stiffness = b.transpose() * d * b * (material.thickness * area);

        self.b = Some(b);
        self.d = Some(d);
        self.stiffness.insert(stiffness)
    }

    /// Recovers `σ = D · B · u` from the local displacement vector and
    /// caches it. Returns `None` if the element was never assembled.
    pub fn recover_stress(&mut self, u: &SVector<f64, 6>) -> Option<Vector3<f64>> {
        let b = self.b?;
        let d = self.d?;
        let stress = d * (b * u);
        self.stress = Some(stress);
        Some(stress)
    }

    pub fn edges(&self) -> [ElementEdge; 3] {
        let [n1, n2, n3] = self.nodes;
        [
            ElementEdge::new(n1, n2),
            ElementEdge::new(n2, n3),
            ElementEdge::new(n3, n1),
        ]
    }
}

/// Plane-stress Von Mises stress (`σz = τxz = τyz = 0`):
/// `σ_v = √((σx−σy)² + σx² + σy² + 6τxy²) / √2`.
pub fn von_mises_stress(sx: f64, sy: f64, txy: f64) -> f64 {
    (((sx - sy) * (sx - sy) + sx * sx + sy * sy + 6.0 * txy * txy) / 2.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn unit_triangle() -> [Point2; 3] {
        [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_follows_winding() {
        let coords = unit_triangle();
        assert_relative_eq!(Element::signed_area(&coords), 0.5);

        let flipped = [coords[0], coords[2], coords[1]];
        assert_relative_eq!(Element::signed_area(&flipped), -0.5);
    }

    #[test]
    fn unit_triangle_strain_matrix() {
        let mut element = Element::new(0, 1, 2);
        let material = Material::new(1000.0, 0.3, 1.0);
        element.compute_stiffness(&unit_triangle(), &material);

        let b = element.b.unwrap();
        // 2A = 1, so the entries are the raw coordinate differences.
        assert_relative_eq!(b[(0, 0)], -1.0);
        assert_relative_eq!(b[(0, 2)], 1.0);
        assert_relative_eq!(b[(0, 4)], 0.0);
        assert_relative_eq!(b[(1, 1)], -1.0);
        assert_relative_eq!(b[(1, 5)], 1.0);
        assert_relative_eq!(b[(2, 0)], -1.0);
        assert_relative_eq!(b[(2, 1)], -1.0);
        assert_relative_eq!(b[(2, 3)], 1.0);
    }

    #[test]
    fn stiffness_is_symmetric() {
        let coords = [
            Point2::new(0.3, -0.2),
            Point2::new(2.1, 0.4),
            Point2::new(0.9, 1.7),
        ];
        let mut element = Element::new(0, 1, 2);
        let material = Material::new(30000.0, 0.25, 10.0);
        let k = *element.compute_stiffness(&coords, &material);

        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], max_relative = 1e-4);
            }
        }
    }

    #[test]
    fn uniform_strain_recovers_uniaxial_stress() {
        let mut element = Element::new(0, 1, 2);
        let material = Material::new(1000.0, 0.3, 1.0);
        element.compute_stiffness(&unit_triangle(), &material);

        // u_i = (εx · x_i, 0) for εx = 1e-3.
        let strain = 1e-3;
        let u = SVector::<f64, 6>::from_column_slice(&[0.0, 0.0, strain, 0.0, 0.0, 0.0]);
        let stress = element.recover_stress(&u).unwrap();

        let factor = 1000.0 / (1.0 - 0.09);
        assert_relative_eq!(stress[0], factor * strain, max_relative = 1e-9);
        assert_relative_eq!(stress[1], factor * 0.3 * strain, max_relative = 1e-9);
        assert_abs_diff_eq!(stress[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn von_mises_of_uniaxial_stress_is_the_stress() {
        assert_relative_eq!(von_mises_stress(100.0, 0.0, 0.0), 100.0);
        assert_relative_eq!(von_mises_stress(0.0, 0.0, 10.0), 10.0 * 3.0_f64.sqrt());
    }
}
