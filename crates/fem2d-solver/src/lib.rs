//! Plane-stress finite-element solver.
//!
//! Assembles the global stiffness of a meshed [`fem2d_model::Model`]
//! row by row into compressed sparse row form, folds displacement
//! constraints into the system, solves it with a conjugate-gradient
//! style iteration, and recovers per-element stresses.

pub mod assembly;
pub mod cg;
pub mod error;
pub mod solver;

pub use assembly::{AssembledSystem, COMPRESSION_TOLERANCE};
pub use cg::{DEFAULT_RESIDUAL_RATIO, SolveSummary, conjugate_gradient};
pub use error::{Result, SolverError};
pub use solver::PlanarStressSolver;
