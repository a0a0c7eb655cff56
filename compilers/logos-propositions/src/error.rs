use logos_clauses::DetectionError;
use logos_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Cannot render {kind} constituent at position {index}")]
    UnsupportedConstituent { index: usize, kind: &'static str },

    #[error("Clause {clause} lost its verb during argument selection")]
    MissingVerb { clause: usize },

    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type GenerationResult<T> = Result<T, GenerationError>;
