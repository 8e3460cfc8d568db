//! Delaunay meshing of planar regions bounded by loops.
//!
//! The mesher triangulates the vertices of one outer loop and any
//! number of hole loops with the Bowyer–Watson algorithm, carves away
//! triangles whose centroid falls outside the region, and optionally
//! refines the mesh by re-triangulating with the centroids of
//! poorly-shaped triangles added as extra vertices. The result is a
//! [`fem2d_model::Model`] ready for the planar stress solver.

pub mod delaunay;
pub mod face;
pub mod mesher;

pub use delaunay::bowyer_watson;
pub use face::{COLLINEAR_TOLERANCE, TriangleEdge, TriangleFace};
pub use mesher::{Mesher, RefinementOptions};
