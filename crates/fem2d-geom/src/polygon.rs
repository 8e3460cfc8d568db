//! Closed polygon loops and winding predicates.

use crate::point::Point2;

/// A closed loop of sample points; the first point is repeated at the
/// end. Winding is carried by point order and read off the signed area.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point2>,
}

impl Polygon {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() > 1 && first.approx_eq(last),
            _ => false,
        }
    }

    /// Shoelace area: negative for clockwise loops, positive for
    /// counter-clockwise ones.
    pub fn signed_area(&self) -> f64 {
        let mut sum = 0.0;
        for pair in self.points.windows(2) {
            sum += pair[0].x * pair[1].y - pair[1].x * pair[0].y;
        }
        sum / 2.0
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Winding count of the loop around `test`. Edges crossing the
    /// horizontal through `test` downward on its right decrement, edges
    /// crossing upward on its left increment; points on an edge count as
    /// crossings in both directions.
    pub fn winding_count(&self, test: &Point2) -> i32 {
        let mut count = 0;
        for pair in self.points.windows(2) {
            let p1 = pair[0];
            let p2 = pair[1];
            let cross =
                (p2.x - p1.x) * (test.y - p1.y) - (test.x - p1.x) * (p2.y - p1.y);
            if p1.y > test.y {
                if p2.y <= test.y && cross <= 0.0 {
                    count -= 1;
                }
            } else if p2.y > test.y && cross >= 0.0 {
                count += 1;
            }
        }
        count
    }

    pub fn contains(&self, test: &Point2) -> bool {
        self.winding_count(test).abs() == 1
    }
}

/// Membership in the region bounded by an outer loop and excluded by
/// inner hole loops. The winding counts of all loops are summed and the
/// magnitude of the sum is compared to one, not its sign: the outer
/// loop contributes ±1 depending on its orientation, and a hole around
/// the point either cancels that count (opposite orientation, sum 0) or
/// doubles it (same orientation, sum ±2). Hole interiors are therefore
/// excluded under every orientation pairing, and callers may mix
/// clockwise and counter-clockwise loops freely.
pub fn region_contains(loops: &[Polygon], test: &Point2) -> bool {
    let total: i32 = loops.iter().map(|polygon| polygon.winding_count(test)).sum();
    total.abs() == 1
}
