//! Plane-stress solve orchestration.

use crate::assembly::assemble;
use crate::cg::{DEFAULT_RESIDUAL_RATIO, SolveSummary, conjugate_gradient};
use crate::error::Result;
use fem2d_model::{Material, Model, Progress, TaskProgress};
use nalgebra::SVector;

/// Solves the plane-stress equilibrium of a meshed model in place:
/// nodes receive their displacements, elements their recovered
/// stresses, and the model is marked solved whether or not the
/// iteration converged.
#[derive(Debug, Clone, Copy)]
pub struct PlanarStressSolver {
    material: Material,
    min_residual_ratio: f64,
}

impl PlanarStressSolver {
    pub fn new(thickness: f64, youngs_modulus: f64, poissons_ratio: f64) -> Self {
        Self::with_material(Material::new(youngs_modulus, poissons_ratio, thickness))
    }

    pub fn with_material(material: Material) -> Self {
        Self {
            material,
            min_residual_ratio: DEFAULT_RESIDUAL_RATIO,
        }
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Runs assembly, the iterative solve, and stress recovery.
    ///
    /// Non-convergence is not an error: the partial solution is written
    /// back and reported through the returned [`SolveSummary`].
    pub fn solve(&self, model: &mut Model, progress: &mut dyn Progress) -> Result<SolveSummary> {
        let system = assemble(model, &self.material, progress)?;
        let (solution, summary) = conjugate_gradient(
            &system.matrix,
            &system.load,
            self.min_residual_ratio,
        );

        for node in &mut model.nodes {
            node.displacement = [solution[node.index * 2], solution[node.index * 2 + 1]];
        }

        let element_count = model.elements.len();
        for (index, element) in model.elements.iter_mut().enumerate() {
            let mut local = SVector::<f64, 6>::zeros();
            for (slot, &node) in element.nodes.iter().enumerate() {
                local[slot * 2] = model.nodes[node].displacement[0];
                local[slot * 2 + 1] = model.nodes[node].displacement[1];
            }
            element.recover_stress(&local);
            progress.report(TaskProgress::new(
                "Recovering stresses",
                ((index + 1) * 100 / element_count) as u8,
            ));
        }

        model.mark_solved();
        Ok(summary)
    }
}
