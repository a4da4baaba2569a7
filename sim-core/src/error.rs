//! Error types for graph construction and play

/// Errors raised by the Sim core
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Graph construction produced {found} {what}, expected {expected}")]
    Topology {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate key in graph construction: {0}")]
    DuplicateKey(String),

    #[error("Label outside of alphabet A-F: {0:?}")]
    InvalidLabel(char),

    #[error("Unknown edge: {0}")]
    UnknownEdge(String),

    #[error("Unknown triangle: {0}")]
    UnknownTriangle(String),

    #[error("No neutral edges remaining")]
    NoNeutralEdges,
}

pub type Result<T> = std::result::Result<T, SimError>;
