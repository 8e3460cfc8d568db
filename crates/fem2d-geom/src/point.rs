//! 2D point with tolerance-based equality.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Componentwise tolerance for point equality. Adequate for geometry
/// near unit scale; the value is part of the contract and is not scaled.
pub const POINT_TOLERANCE: f64 = 1e-4;

/// A point in the plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Componentwise equality within [`POINT_TOLERANCE`].
    pub fn approx_eq(&self, other: &Point2) -> bool {
        (self.x - other.x).abs() < POINT_TOLERANCE && (self.y - other.y).abs() < POINT_TOLERANCE
    }

    pub fn distance_squared(&self, other: &Point2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Point2;

    fn mul(self, rhs: f64) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn equality_within_tolerance() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(1.0 + 5e-5, 2.0 - 5e-5);
        assert!(a.approx_eq(&b));

        let c = Point2::new(1.0 + 2e-4, 2.0);
        assert!(!a.approx_eq(&c));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert_relative_eq!(a.distance(&b), 5.0);
        assert_relative_eq!(a.distance_squared(&b), 25.0);
    }

    #[test]
    fn arithmetic() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(3.0, -1.0);
        assert_eq!(a + b, Point2::new(4.0, 1.0));
        assert_eq!(b - a, Point2::new(2.0, -3.0));
        assert_eq!(a * 2.0, Point2::new(2.0, 4.0));
    }
}
