//! Boundary entities: line segments and circular arcs.

use crate::point::Point2;
use std::f64::consts::TAU;

/// Straight boundary piece between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point2,
    pub end: Point2,
}

impl LineSegment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            start: Point2::new(x1, y1),
            end: Point2::new(x2, y2),
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Samples at step ≤ `max_spacing`, in order from `start`; the end
    /// point is left for the following entity to supply.
    fn sample(&self, max_spacing: f64) -> Vec<Point2> {
        let count = (self.length() / max_spacing).ceil() as usize;
        let mut points = Vec::with_capacity(count);
        for i in 0..count {
            let t = i as f64 / count as f64;
            points.push(self.start + (self.end - self.start) * t);
        }
        points
    }
}

/// Circular arc described by centre, radius and start/end angles in
/// degrees. A negative span wraps around through 360°.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub start_deg: f64,
    pub end_deg: f64,
}

impl Arc {
    pub fn new(cx: f64, cy: f64, r: f64, start_deg: f64, end_deg: f64) -> Self {
        Self {
            cx,
            cy,
            r,
            start_deg,
            end_deg,
        }
    }

    /// Swept angle in degrees, wrapped to a positive span.
    pub fn delta_deg(&self) -> f64 {
        let delta = self.end_deg - self.start_deg;
        if delta < 0.0 {
            360.0 - self.start_deg + self.end_deg
        } else {
            delta
        }
    }

    fn point_at(&self, angle_rad: f64) -> Point2 {
        let angle = if angle_rad > TAU {
            angle_rad - TAU
        } else {
            angle_rad
        };
        Point2::new(
            self.cx + self.r * angle.cos(),
            self.cy + self.r * angle.sin(),
        )
    }

    pub fn start_point(&self) -> Point2 {
        self.point_at(self.start_deg.to_radians())
    }

    pub fn end_point(&self) -> Point2 {
        self.point_at(self.end_deg.to_radians())
    }

    fn sample(&self, max_spacing: f64) -> Vec<Point2> {
        let start = self.start_deg.to_radians();
        let delta = self.delta_deg().to_radians();
        let count = ((self.r * delta).abs() / max_spacing).ceil() as usize;
        let mut points = Vec::with_capacity(count);
        for i in 0..count {
            points.push(self.point_at(start + delta * i as f64 / count as f64));
        }
        points
    }
}

/// Tagged boundary entity handled by [`crate::LoopBuilder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entity {
    Segment(LineSegment),
    Arc(Arc),
}

impl Entity {
    pub fn start_point(&self) -> Point2 {
        match self {
            Entity::Segment(segment) => segment.start,
            Entity::Arc(arc) => arc.start_point(),
        }
    }

    pub fn end_point(&self) -> Point2 {
        match self {
            Entity::Segment(segment) => segment.end,
            Entity::Arc(arc) => arc.end_point(),
        }
    }

    /// Discretises the entity into points with step ≤ `max_spacing`,
    /// reversed when `revert` is set.
    pub fn sample(&self, max_spacing: f64, revert: bool) -> Vec<Point2> {
        let mut points = match self {
            Entity::Segment(segment) => segment.sample(max_spacing),
            Entity::Arc(arc) => arc.sample(max_spacing),
        };
        if revert {
            points.reverse();
        }
        points
    }
}
