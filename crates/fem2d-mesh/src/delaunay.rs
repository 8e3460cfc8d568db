//! Incremental Delaunay triangulation by cavity retriangulation.

use crate::face::{TriangleEdge, TriangleFace};
use fem2d_geom::{BoundingBox, Point2};
use fem2d_model::{Progress, TaskProgress};

/// Three synthetic vertices enclosing every input point, placed around
/// the bounding box centre at twice the larger extent.
fn super_triangle(bounds: &BoundingBox) -> [Point2; 3] {
    let l = bounds.extent();
    let c = bounds.center();
    [
        Point2::new(c.x - 2.0 * l, c.y - l),
        Point2::new(c.x, c.y + 2.0 * l),
        Point2::new(c.x + 2.0 * l, c.y - l),
    ]
}

/// Deletes every face whose circumcircle contains the new vertex, then
/// retriangulates the cavity boundary against it. The boundary falls
/// out of edge cancellation: interior cavity edges appear once in each
/// direction and annihilate.
fn insert_vertex(points: &[Point2], faces: &mut Vec<TriangleFace>, vertex: usize) {
    let point = points[vertex];
    let mut cavity: Vec<TriangleEdge> = Vec::new();
    let mut kept = Vec::with_capacity(faces.len());

    for face in std::mem::take(faces) {
        if face.circumcircle_contains(points, &point) {
            for edge in face.edges() {
                if let Some(position) = cavity.iter().position(|e| *e == edge.reversed()) {
                    cavity.remove(position);
                } else {
                    cavity.push(edge);
                }
            }
        } else {
            kept.push(face);
        }
    }

    *faces = kept;
    for edge in cavity {
        faces.push(TriangleFace::new(edge.v1, edge.v2, vertex));
    }
}

/// Delaunay triangulation of `vertices`, inserted in order. The
/// returned faces reference indices into `vertices`; faces touching the
/// synthetic super-triangle are removed. With fewer than three usable
/// vertices the result is empty.
pub fn bowyer_watson(vertices: &[Point2], progress: &mut dyn Progress) -> Vec<TriangleFace> {
    let count = vertices.len();
    let Some(bounds) = BoundingBox::from_points(vertices) else {
        return Vec::new();
    };
    if count < 3 {
        return Vec::new();
    }

    let mut points = Vec::with_capacity(count + 3);
    points.extend_from_slice(vertices);
    points.extend_from_slice(&super_triangle(&bounds));

    let mut faces = vec![TriangleFace::new(count, count + 1, count + 2)];
    for vertex in 0..count {
        insert_vertex(&points, &mut faces, vertex);
        progress.report(TaskProgress::new(
            "Triangulating",
            ((vertex + 1) * 100 / count) as u8,
        ));
    }

    faces.retain(|face| !face.references_from(count));
    faces
}
