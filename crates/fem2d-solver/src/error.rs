//! Error types for fem2d-solver

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SolverError>;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("model has no nodes to solve")]
    EmptyModel,

    #[error("model is inconsistent: {0}")]
    InvalidModel(#[from] fem2d_model::ModelError),

    #[error("sparse assembly failed: {0}")]
    Assembly(String),
}
