//! Error types for fem2d-model

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("element {element} references node {node} but the model has {nodes} nodes")]
    NodeOutOfRange {
        element: usize,
        node: usize,
        nodes: usize,
    },
}
