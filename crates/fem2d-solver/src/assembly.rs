//! Row-by-row global stiffness assembly with constraint folding.

use crate::error::{Result, SolverError};
use fem2d_geom::Point2;
use fem2d_model::{Material, Model, Progress, TaskProgress};
use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;

/// Entries with a magnitude at or below this threshold are dropped when
/// a dense row is compressed into the sparse representation.
pub const COMPRESSION_TOLERANCE: f64 = 1e-5;

/// The folded global system `A·x = b` together with the constraint
/// bookkeeping needed to interpret the solution.
#[derive(Debug, Clone)]
pub struct AssembledSystem {
    pub matrix: CsrMatrix<f64>,
    pub load: DVector<f64>,
    /// Prescribed displacement per DOF; meaningful where `fixed` holds.
    pub prescribed: Vec<f64>,
    pub fixed: Vec<bool>,
}

impl AssembledSystem {
    pub fn num_dofs(&self) -> usize {
        self.load.len()
    }
}

/// Assembles the global stiffness of `model` row by row.
///
/// Per DOF row the element stiffnesses of every incident element are
/// scattered into a dense scratch row, Dirichlet constraints are folded
/// (known displacements move to the right-hand side; a fixed row is
/// replaced by its diagonal equation), and the row is compressed into
/// CSR form. Element stiffnesses are computed once and cached on the
/// elements.
pub fn assemble(
    model: &mut Model,
    material: &Material,
    progress: &mut dyn Progress,
) -> Result<AssembledSystem> {
    let node_count = model.nodes.len();
    if node_count == 0 {
        return Err(SolverError::EmptyModel);
    }
    model.validate()?;
    let dof_count = node_count * 2;

    // Dense DOF indices are assigned here, at solve start.
    for (index, node) in model.nodes.iter_mut().enumerate() {
        node.index = index;
    }

    let mut fixed = vec![false; dof_count];
    let mut prescribed = vec![0.0_f64; dof_count];
    let mut load = vec![0.0_f64; dof_count];
    for node in &model.nodes {
        let dof = node.index * 2;
        if let Some(value) = node.constraint_x {
            fixed[dof] = true;
            prescribed[dof] = value;
        }
        if let Some(value) = node.constraint_y {
            fixed[dof + 1] = true;
            prescribed[dof + 1] = value;
        }
        if let Some([lx, ly]) = node.load {
            load[dof] += lx;
            load[dof + 1] += ly;
        }
    }

    let mut incident = vec![Vec::new(); node_count];
    for (index, element) in model.elements.iter().enumerate() {
        for &node in &element.nodes {
            incident[node].push(index);
        }
    }

    for element in &mut model.elements {
        let [n1, n2, n3] = element.nodes;
        let coords = [
            Point2::new(model.nodes[n1].x, model.nodes[n1].y),
            Point2::new(model.nodes[n2].x, model.nodes[n2].y),
            Point2::new(model.nodes[n3].x, model.nodes[n3].y),
        ];
        element.compute_stiffness(&coords, material);
    }

    let mut row_offsets = Vec::with_capacity(dof_count + 1);
    row_offsets.push(0);
    let mut col_indices = Vec::new();
    let mut values = Vec::new();
    let mut row = vec![0.0_f64; dof_count];

    for i in 0..dof_count {
        row.fill(0.0);
        let node = i / 2;
        let direction = i % 2;

        for &element_index in &incident[node] {
            let element = &model.elements[element_index];
            let Some(stiffness) = element.stiffness.as_ref() else {
                continue;
            };
            let Some(local_node) = element.nodes.iter().position(|&n| n == node) else {
                continue;
            };
            let local_row = local_node * 2 + direction;
            for local_col in 0..6 {
                let j = element.nodes[local_col / 2] * 2 + local_col % 2;
                row[j] += stiffness[(local_row, local_col)];
            }
        }

        if fixed[i] {
            // Dirichlet enforcement by row substitution: only the
            // diagonal survives and the right-hand side pins the value.
            load[i] = row[i] * prescribed[i];
            for (j, value) in row.iter_mut().enumerate() {
                if j != i {
                    *value = 0.0;
                }
            }
        } else {
            for j in 0..dof_count {
                if fixed[j] && row[j] != 0.0 {
                    load[i] -= row[j] * prescribed[j];
                    row[j] = 0.0;
                }
            }
        }

        for (j, &value) in row.iter().enumerate() {
            if value.abs() > COMPRESSION_TOLERANCE {
                col_indices.push(j);
                values.push(value);
            }
        }
        row_offsets.push(values.len());

        progress.report(TaskProgress::new(
            "Assembling stiffness",
            ((i + 1) * 100 / dof_count) as u8,
        ));
    }

    let matrix = CsrMatrix::try_from_csr_data(dof_count, dof_count, row_offsets, col_indices, values)
        .map_err(|error| SolverError::Assembly(format!("{error:?}")))?;

    Ok(AssembledSystem {
        matrix,
        load: DVector::from_vec(load),
        prescribed,
        fixed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fem2d_model::{Element, Node, NullProgress};

    /// Single unit triangle, node 0 fully fixed, node 1 fixed in y,
    /// node 2 loaded along x.
    fn patch_model() -> Model {
        let mut nodes = vec![
            Node::new(0.0, 0.0),
            Node::new(1.0, 0.0),
            Node::new(0.0, 1.0),
        ];
        for (index, node) in nodes.iter_mut().enumerate() {
            node.index = index;
        }
        nodes[0].fix_all();
        nodes[1].fix_y();
        nodes[2].apply_load(1.0, 0.0);
        Model::from_mesh(nodes, vec![Element::new(0, 1, 2)])
    }

    #[test]
    fn fixed_rows_reduce_to_their_diagonal() {
        let mut model = patch_model();
        let material = Material::new(1000.0, 0.25, 1.0);
        let system = assemble(&mut model, &material, &mut NullProgress).unwrap();

        assert_eq!(system.num_dofs(), 6);

        // DOFs 0, 1 (node 0) and 3 (node 1 y) are fixed.
        for &dof in &[0_usize, 1, 3] {
            assert!(system.fixed[dof]);
            let row = system.matrix.row(dof);
            assert_eq!(row.nnz(), 1);
            assert_eq!(row.col_indices(), &[dof][..]);
            // Zero prescribed displacement pins the RHS to zero.
            assert_relative_eq!(system.load[dof], 0.0);
        }
    }

    #[test]
    fn folded_matrix_is_symmetric() {
        let mut model = patch_model();
        let material = Material::new(1000.0, 0.25, 1.0);
        let system = assemble(&mut model, &material, &mut NullProgress).unwrap();

        let n = system.num_dofs();
        for i in 0..n {
            for j in 0..n {
                let a = system.matrix.get_entry(i, j).map_or(0.0, |e| e.into_value());
                let b = system.matrix.get_entry(j, i).map_or(0.0, |e| e.into_value());
                if i == j || (!system.fixed[i] && !system.fixed[j]) {
                    assert_relative_eq!(a, b, max_relative = 1e-9);
                }
            }
        }
    }

    #[test]
    fn applied_loads_reach_the_rhs() {
        let mut model = patch_model();
        let material = Material::new(1000.0, 0.25, 1.0);
        let system = assemble(&mut model, &material, &mut NullProgress).unwrap();

        // Node 2 x-load lands on DOF 4 and is not a fixed row.
        assert!(!system.fixed[4]);
        assert_relative_eq!(system.load[4], 1.0);
    }

    #[test]
    fn empty_model_is_rejected() {
        let mut model = Model::new();
        let material = Material::new(1000.0, 0.25, 1.0);
        assert!(matches!(
            assemble(&mut model, &material, &mut NullProgress),
            Err(SolverError::EmptyModel)
        ));
    }

    #[test]
    fn prescribed_displacement_folds_into_free_rows() {
        let mut nodes = vec![
            Node::new(0.0, 0.0),
            Node::new(1.0, 0.0),
            Node::new(0.0, 1.0),
        ];
        for (index, node) in nodes.iter_mut().enumerate() {
            node.index = index;
        }
        nodes[0].fix_all();
        nodes[1].apply_displacement_along_x(0.1);
        nodes[1].fix_y();
        let mut model = Model::from_mesh(nodes, vec![Element::new(0, 1, 2)]);

        let material = Material::new(1000.0, 0.25, 1.0);
        let system = assemble(&mut model, &material, &mut NullProgress).unwrap();

        // The fixed DOF keeps its diagonal equation...
        let diag = system.matrix.get_entry(2, 2).map_or(0.0, |e| e.into_value());
        assert_relative_eq!(system.load[2], diag * 0.1, max_relative = 1e-9);
        // ...and free rows saw the known displacement move to the RHS.
        assert!(system.load.iter().any(|&v| v != 0.0));
    }
}
