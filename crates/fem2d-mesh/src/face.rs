//! Triangulation faces, cavity edges, and the circumcircle predicate.

use fem2d_geom::Point2;

/// Degeneracy guard for the circumcentre computation.
pub const COLLINEAR_TOLERANCE: f64 = 1e-6;

/// Directed edge used for Watson-cavity bookkeeping. Equality is
/// positional: the reverse of an edge is a distinct value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriangleEdge {
    pub v1: usize,
    pub v2: usize,
}

impl TriangleEdge {
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

/// Triangle referencing vertex indices of the triangulation's point
/// list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleFace {
    pub v1: usize,
    pub v2: usize,
    pub v3: usize,
}

impl TriangleFace {
    pub fn new(v1: usize, v2: usize, v3: usize) -> Self {
        Self { v1, v2, v3 }
    }

    pub fn vertices(&self) -> [usize; 3] {
        [self.v1, self.v2, self.v3]
    }

    /// True when any vertex index is at or above `first_synthetic`,
    /// i.e. the face touches the super-triangle.
    pub fn references_from(&self, first_synthetic: usize) -> bool {
        self.vertices().iter().any(|&v| v >= first_synthetic)
    }

    pub fn edges(&self) -> [TriangleEdge; 3] {
        [
            TriangleEdge::new(self.v1, self.v2),
            TriangleEdge::new(self.v2, self.v3),
            TriangleEdge::new(self.v3, self.v1),
        ]
    }

    pub fn centroid(&self, points: &[Point2]) -> Point2 {
        let [p1, p2, p3] = self.coords(points);
        Point2::new((p1.x + p2.x + p3.x) / 3.0, (p1.y + p2.y + p3.y) / 3.0)
    }

    pub fn coords(&self, points: &[Point2]) -> [Point2; 3] {
        [points[self.v1], points[self.v2], points[self.v3]]
    }

    pub fn area(&self, points: &[Point2]) -> f64 {
        let [p1, p2, p3] = self.coords(points);
        ((p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y)) / 2.0).abs()
    }

    /// Shape quality in `[0, 1]`: 1 for an equilateral triangle,
    /// approaching 0 for a sliver. For edge lengths `a`, `b`, `c` the
    /// score is `(b+c-a)(c+a-b)(a+b-c)/(abc)`.
    pub fn shape_score(&self, points: &[Point2]) -> f64 {
        let [p1, p2, p3] = self.coords(points);
        let a = p1.distance(&p2);
        let b = p2.distance(&p3);
        let c = p3.distance(&p1);
        let denominator = a * b * c;
        if denominator == 0.0 {
            return 0.0;
        }
        (b + c - a) * (c + a - b) * (a + b - c) / denominator
    }

    /// Whether `test` lies inside or on the circumcircle of this face.
    ///
    /// The circumcentre is intersected from perpendicular bisectors,
    /// picking bisector pairs whose edges have a usable y-difference. A
    /// face whose vertices all share one y within the tolerance is
    /// degenerate and contains nothing.
    pub fn circumcircle_contains(&self, points: &[Point2], test: &Point2) -> bool {
        let [p1, p2, p3] = self.coords(points);

        let dy12 = (p2.y - p1.y).abs();
        let dy23 = (p3.y - p2.y).abs();
        if dy12 < COLLINEAR_TOLERANCE && dy23 < COLLINEAR_TOLERANCE {
            return false;
        }

        let (xc, yc);
        if dy12 < COLLINEAR_TOLERANCE {
            let m2 = -(p3.x - p2.x) / (p3.y - p2.y);
            let mx2 = (p2.x + p3.x) / 2.0;
            let my2 = (p2.y + p3.y) / 2.0;
            xc = (p1.x + p2.x) / 2.0;
            yc = m2 * (xc - mx2) + my2;
        } else if dy23 < COLLINEAR_TOLERANCE {
            let m1 = -(p2.x - p1.x) / (p2.y - p1.y);
            let mx1 = (p1.x + p2.x) / 2.0;
            let my1 = (p1.y + p2.y) / 2.0;
            xc = (p2.x + p3.x) / 2.0;
            yc = m1 * (xc - mx1) + my1;
        } else {
            let m1 = -(p2.x - p1.x) / (p2.y - p1.y);
            let m2 = -(p3.x - p2.x) / (p3.y - p2.y);
            let mx1 = (p1.x + p2.x) / 2.0;
            let my1 = (p1.y + p2.y) / 2.0;
            let mx2 = (p2.x + p3.x) / 2.0;
            let my2 = (p2.y + p3.y) / 2.0;
            xc = (m1 * mx1 - m2 * mx2 + my2 - my1) / (m1 - m2);
            yc = m1 * (xc - mx1) + my1;
        }

        let centre = Point2::new(xc, yc);
        test.distance_squared(&centre) <= p2.distance_squared(&centre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn points() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(1.0, 0.5),   // inside the circumcircle
            Point2::new(10.0, 10.0), // far outside
        ]
    }

    #[test]
    fn circumcircle_test_separates_inside_from_outside() {
        let points = points();
        let face = TriangleFace::new(0, 1, 2);
        assert!(face.circumcircle_contains(&points, &points[3]));
        assert!(!face.circumcircle_contains(&points, &points[4]));
    }

    #[test]
    fn on_circle_counts_as_inside() {
        let points = vec![
            Point2::new(-1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, -1.0), // on the unit circumcircle
        ];
        let face = TriangleFace::new(0, 1, 2);
        assert!(face.circumcircle_contains(&points, &points[3]));
    }

    #[test]
    fn flat_face_contains_nothing() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 0.5),
        ];
        let face = TriangleFace::new(0, 1, 2);
        assert!(!face.circumcircle_contains(&points, &points[3]));
    }

    #[test]
    fn shape_score_prefers_equilateral() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 3.0_f64.sqrt() / 2.0),
            Point2::new(10.0, 0.05),
        ];
        let equilateral = TriangleFace::new(0, 1, 2);
        assert_relative_eq!(equilateral.shape_score(&points), 1.0, max_relative = 1e-9);

        let sliver = TriangleFace::new(0, 1, 3);
        assert!(sliver.shape_score(&points) < 0.1);
    }

    #[test]
    fn edges_and_cancellation_pairs() {
        let face = TriangleFace::new(3, 7, 9);
        let edges = face.edges();
        assert_eq!(edges[0], TriangleEdge::new(3, 7));
        assert_eq!(edges[0].reversed(), TriangleEdge::new(7, 3));
        assert_ne!(edges[0], edges[0].reversed());
    }

    #[test]
    fn synthetic_reference_detection() {
        assert!(TriangleFace::new(0, 1, 8).references_from(8));
        assert!(!TriangleFace::new(0, 1, 7).references_from(8));
    }
}
