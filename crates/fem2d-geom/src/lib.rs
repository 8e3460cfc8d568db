//! Planar geometry for the 2D finite-element pipeline.
//!
//! This crate provides the building blocks consumed by the mesher:
//! 2D points with tolerance-based equality, line segments and circular
//! arcs, axis-aligned bounding boxes, closed polygon loops with winding
//! predicates, and [`LoopBuilder`], which welds an ordered sequence of
//! segments and arcs into a closed oriented polygon of sample points.

pub mod bounds;
pub mod builder;
pub mod entity;
pub mod error;
pub mod point;
pub mod polygon;

pub use bounds::BoundingBox;
pub use builder::LoopBuilder;
pub use entity::{Arc, Entity, LineSegment};
pub use error::{GeometryError, Result};
pub use point::{POINT_TOLERANCE, Point2};
pub use polygon::{Polygon, region_contains};
