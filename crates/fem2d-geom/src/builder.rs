//! Welds ordered segments and arcs into a closed oriented polygon.

use crate::entity::{Arc, Entity, LineSegment};
use crate::error::{GeometryError, Result};
use crate::polygon::Polygon;

#[derive(Debug, Clone, Copy)]
struct StoredEntity {
    entity: Entity,
    revert: bool,
}

/// Accumulates boundary entities in drawing order and discretises them
/// into a single closed loop. Each added entity is chained to the
/// previous one by endpoint matching; an entity whose endpoints touch
/// neither end of the previous entity is dropped. Invalid primitives
/// are recorded and surface when [`LoopBuilder::build`] is called.
#[derive(Debug, Default)]
pub struct LoopBuilder {
    entities: Vec<StoredEntity>,
    errors: Vec<String>,
}

impl LoopBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_line_segment(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> &mut Self {
        self.push(Entity::Segment(LineSegment::new(x1, y1, x2, y2)));
        self
    }

    pub fn add_arc(&mut self, cx: f64, cy: f64, r: f64, start_deg: f64, end_deg: f64) -> &mut Self {
        if r <= 0.0 {
            self.errors.push(format!("arc radius must be positive, got {r}"));
            return self;
        }
        self.push(Entity::Arc(Arc::new(cx, cy, r, start_deg, end_deg)));
        self
    }

    /// Full circle, an arc from 0° to 360°.
    pub fn add_circle(&mut self, cx: f64, cy: f64, r: f64) -> &mut Self {
        self.add_arc(cx, cy, r, 0.0, 360.0)
    }

    /// Rectangle centred on `(cx, cy)` with half-extents `w` and `h`,
    /// drawn as four counter-clockwise segments.
    pub fn add_rectangle(&mut self, cx: f64, cy: f64, w: f64, h: f64) -> &mut Self {
        if w <= 0.0 || h <= 0.0 {
            self.errors
                .push(format!("rectangle extents must be positive, got {w} x {h}"));
            return self;
        }
        self.add_line_segment(cx - w, cy - h, cx + w, cy - h)
            .add_line_segment(cx + w, cy - h, cx + w, cy + h)
            .add_line_segment(cx + w, cy + h, cx - w, cy + h)
            .add_line_segment(cx - w, cy + h, cx - w, cy - h)
    }

    fn push(&mut self, entity: Entity) {
        let revert = match self.entities.last() {
            None => false,
            Some(previous) => {
                let p_start = previous.entity.start_point();
                let p_end = previous.entity.end_point();
                let e_start = entity.start_point();
                let e_end = entity.end_point();
                if e_start.approx_eq(&p_end) {
                    false
                } else if e_end.approx_eq(&p_start) {
                    true
                } else if e_start.approx_eq(&p_start) {
                    false
                } else if e_end.approx_eq(&p_end) {
                    true
                } else {
                    // Does not chain onto the previous entity; dropped.
                    return;
                }
            }
        };
        self.entities.push(StoredEntity { entity, revert });
    }

    /// Discretises every entity with step ≤ `max_spacing`, closes the
    /// loop, and orients it to the requested winding.
    pub fn build(&self, clockwise: bool, max_spacing: f64) -> Result<Polygon> {
        if let Some(error) = self.errors.first() {
            return Err(GeometryError::InvalidArgument(error.clone()));
        }
        if max_spacing <= 0.0 {
            return Err(GeometryError::InvalidArgument(format!(
                "max spacing must be positive, got {max_spacing}"
            )));
        }
        if self.entities.is_empty() {
            return Err(GeometryError::InvalidArgument(
                "loop has no entities".into(),
            ));
        }

        let mut points = Vec::new();
        for stored in &self.entities {
            points.extend(stored.entity.sample(max_spacing, stored.revert));
        }
        if let Some(&first) = points.first() {
            points.push(first);
        }

        let mut polygon = Polygon::new(points);
        if polygon.is_clockwise() != clockwise {
            polygon.reverse();
        }
        Ok(polygon)
    }
}
