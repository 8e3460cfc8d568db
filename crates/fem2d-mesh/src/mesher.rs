//! Loop-bounded meshing pipeline: triangulate, carve, refine, emit.

use crate::delaunay::bowyer_watson;
use crate::face::TriangleFace;
use fem2d_geom::{GeometryError, Point2, Polygon, region_contains};
use fem2d_model::{Element, Model, Node, Progress, TaskProgress};

/// Controls the iterative refinement of
/// [`Mesher::triangulate_iteratively`]. A triangle whose shape score
/// falls below `quality_threshold` and whose area exceeds `min_area`
/// contributes its centroid as an extra vertex for the next pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinementOptions {
    pub quality_threshold: f64,
    pub min_area: f64,
    pub max_passes: usize,
}

impl Default for RefinementOptions {
    fn default() -> Self {
        Self {
            quality_threshold: 0.5,
            min_area: 1e-2,
            max_passes: 8,
        }
    }
}

/// Triangulates the region enclosed by an outer loop and excluded by
/// hole loops. The first loop added is the outer boundary; all further
/// loops are holes.
#[derive(Debug, Default)]
pub struct Mesher {
    loops: Vec<Polygon>,
    refinement: RefinementOptions,
}

impl Mesher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_refinement(refinement: RefinementOptions) -> Self {
        Self {
            loops: Vec::new(),
            refinement,
        }
    }

    pub fn add_loop(&mut self, polygon: Polygon) -> Result<&mut Self, GeometryError> {
        if polygon.is_empty() {
            return Err(GeometryError::InvalidArgument(
                "cannot mesh an empty loop".into(),
            ));
        }
        self.loops.push(polygon);
        Ok(self)
    }

    pub fn loops(&self) -> &[Polygon] {
        &self.loops
    }

    /// Loop vertices in input order, with the closing point of each
    /// loop dropped so seams carry no duplicates.
    fn input_vertices(&self) -> Vec<Point2> {
        let mut vertices = Vec::new();
        for polygon in &self.loops {
            let points = polygon.points();
            let take = if polygon.is_closed() {
                points.len() - 1
            } else {
                points.len()
            };
            vertices.extend_from_slice(&points[..take]);
        }
        vertices
    }

    /// One full Delaunay pass followed by interior carving: a face
    /// survives iff its centroid lies inside the outer loop and outside
    /// every hole.
    fn mesh_pass(&self, vertices: &[Point2], progress: &mut dyn Progress) -> Vec<TriangleFace> {
        let mut faces = bowyer_watson(vertices, progress);
        faces.retain(|face| region_contains(&self.loops, &face.centroid(vertices)));
        faces
    }

    /// Single-pass triangulation.
    pub fn triangulate(&self, progress: &mut dyn Progress) -> Model {
        let vertices = self.input_vertices();
        let faces = self.mesh_pass(&vertices, progress);
        emit_model(&vertices, &faces)
    }

    /// Triangulation with quality refinement: repeats whole passes,
    /// feeding the centroids of poorly-shaped triangles back in as
    /// improvement vertices, until no triangle is flagged or the pass
    /// budget is spent.
    pub fn triangulate_iteratively(&self, progress: &mut dyn Progress) -> Model {
        let mut vertices = self.input_vertices();
        let mut faces = self.mesh_pass(&vertices, progress);

        for pass in 0..self.refinement.max_passes {
            let additions: Vec<Point2> = faces
                .iter()
                .filter(|face| {
                    face.area(&vertices) > self.refinement.min_area
                        && face.shape_score(&vertices) < self.refinement.quality_threshold
                })
                .map(|face| face.centroid(&vertices))
                .collect();

            progress.report(TaskProgress::new(
                format!("Refinement pass {}: {} triangles flagged", pass + 1, additions.len()),
                ((pass + 1) * 100 / self.refinement.max_passes) as u8,
            ));

            if additions.is_empty() {
                break;
            }
            vertices.extend(additions);
            faces = self.mesh_pass(&vertices, progress);
        }

        emit_model(&vertices, &faces)
    }
}

/// Turns vertices and surviving faces into a model. Elements are wound
/// counter-clockwise so their signed area, and with it the local
/// stiffness, comes out positive.
fn emit_model(vertices: &[Point2], faces: &[TriangleFace]) -> Model {
    let nodes = vertices
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let mut node = Node::new(point.x, point.y);
            node.index = index;
            node
        })
        .collect();

    let elements = faces
        .iter()
        .filter(|face| face.area(vertices) > 0.0)
        .map(|face| {
            let [v1, v2, v3] = face.vertices();
            let coords = face.coords(vertices);
            if Element::signed_area(&coords) < 0.0 {
                Element::new(v1, v3, v2)
            } else {
                Element::new(v1, v2, v3)
            }
        })
        .collect();

    Model::from_mesh(nodes, elements)
}
