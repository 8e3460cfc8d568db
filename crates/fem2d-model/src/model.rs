//! The assembled finite-element model and its post-processing passes.

use crate::element::{Element, ElementEdge, von_mises_stress};
use crate::error::{ModelError, Result};
use crate::node::Node;
use fem2d_geom::Point2;
use serde::{Deserialize, Serialize};

/// Lifecycle of a model. Transitions only move forward; there is no
/// unsolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ModelState {
    Empty,
    Meshed,
    Solved,
    Plotted,
}

/// Indexed nodes and elements plus lazily derived boundary edges and
/// the per-node scalar range written by plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub nodes: Vec<Node>,
    pub elements: Vec<Element>,
    /// Boundary edges, filled by [`Model::compute_edges`].
    pub edges: Vec<ElementEdge>,
    pub min_value: f64,
    pub max_value: f64,
    pub min_node: Option<usize>,
    pub max_node: Option<usize>,
    pub is_solved: bool,
    state: ModelState,
}

impl Model {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            elements: Vec::new(),
            edges: Vec::new(),
            min_value: 0.0,
            max_value: 0.0,
            min_node: None,
            max_node: None,
            is_solved: false,
            state: ModelState::Empty,
        }
    }

    /// Wraps the mesher's output.
    pub fn from_mesh(nodes: Vec<Node>, elements: Vec<Element>) -> Self {
        let mut model = Self::new();
        model.nodes = nodes;
        model.elements = elements;
        model.advance(ModelState::Meshed);
        model
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    fn advance(&mut self, state: ModelState) {
        if state > self.state {
            self.state = state;
        }
    }

    /// Checks that every element references an existing node.
    pub fn validate(&self) -> Result<()> {
        for (index, element) in self.elements.iter().enumerate() {
            for &node in &element.nodes {
                if node >= self.nodes.len() {
                    return Err(ModelError::NodeOutOfRange {
                        element: index,
                        node,
                        nodes: self.nodes.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Vertex coordinates of an element, in connectivity order.
    pub fn element_coords(&self, element: &Element) -> [Point2; 3] {
        let [n1, n2, n3] = element.nodes;
        [
            Point2::new(self.nodes[n1].x, self.nodes[n1].y),
            Point2::new(self.nodes[n2].x, self.nodes[n2].y),
            Point2::new(self.nodes[n3].x, self.nodes[n3].y),
        ]
    }

    /// Marks the model solved. Called by the solver after the iterative
    /// solve finished, converged or not.
    pub fn mark_solved(&mut self) {
        self.is_solved = true;
        self.advance(ModelState::Solved);
    }

    /// Extracts the boundary of the mesh: every directed element edge is
    /// appended unless its reverse is already present, in which case the
    /// pair cancels. Interior edges are shared by two elements with
    /// opposite direction and vanish; the residue is the boundary.
    pub fn compute_edges(&mut self) {
        let mut edges: Vec<ElementEdge> = Vec::new();
        for element in &self.elements {
            for edge in element.edges() {
                if let Some(position) = edges.iter().position(|e| *e == edge.reversed()) {
                    edges.remove(position);
                } else {
                    edges.push(edge);
                }
            }
        }
        self.edges = edges;
    }

    /// Averages element stresses into the nodes, recomputes the nodal
    /// Von Mises field, tracks its range, and normalises every node
    /// into a color index in `[0, 255]`.
    pub fn plot_average_von_mises(&mut self) {
        let count = self.nodes.len();
        let mut sums = vec![[0.0_f64; 3]; count];
        let mut hits = vec![0_usize; count];

        for element in &self.elements {
            let Some(stress) = element.stress else { continue };
            for &node in &element.nodes {
                sums[node][0] += stress[0];
                sums[node][1] += stress[1];
                sums[node][2] += stress[2];
                hits[node] += 1;
            }
        }

        self.min_value = 0.0;
        self.max_value = 0.0;
        self.min_node = None;
        self.max_node = None;

        for (index, node) in self.nodes.iter_mut().enumerate() {
            if hits[index] == 0 {
                continue;
            }
            let n = hits[index] as f64;
            node.stress = [
                sums[index][0] / n,
                sums[index][1] / n,
                sums[index][2] / n,
            ];
            node.von_mises = von_mises_stress(node.stress[0], node.stress[1], node.stress[2]);

            if self.min_node.is_none() || node.von_mises < self.min_value {
                self.min_value = node.von_mises;
                self.min_node = Some(index);
            }
            if self.max_node.is_none() || node.von_mises > self.max_value {
                self.max_value = node.von_mises;
                self.max_node = Some(index);
            }
        }

        let range = self.max_value - self.min_value;
        for node in &mut self.nodes {
            node.color_index = if range == 0.0 {
                0
            } else {
                ((node.von_mises - self.min_value) / range * 255.0)
                    .round()
                    .clamp(0.0, 255.0) as u8
            };
        }

        self.advance(ModelState::Plotted);
    }

    pub fn statistics(&self) -> ModelStatistics {
        ModelStatistics {
            num_nodes: self.nodes.len(),
            num_elements: self.elements.len(),
            num_dofs: self.nodes.len() * 2,
            num_boundary_edges: self.edges.len(),
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

/// Model statistics for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStatistics {
    pub num_nodes: usize,
    pub num_elements: usize,
    pub num_dofs: usize,
    pub num_boundary_edges: usize,
}

impl ModelStatistics {
    pub fn format(&self) -> String {
        [
            format!("Nodes: {}", self.num_nodes),
            format!("Elements: {}", self.num_elements),
            format!("DOFs: {}", self.num_dofs),
            format!("Boundary edges: {}", self.num_boundary_edges),
        ]
        .join("\n")
    }
}
