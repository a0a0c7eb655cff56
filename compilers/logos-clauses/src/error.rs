use logos_graph::GraphError;
use logos_protocol::TokenId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("Malformed graph at token {token}: {reason}")]
    MalformedGraph { token: TokenId, reason: &'static str },

    #[error("Clause nesting deeper than {depth} levels")]
    RecursionLimit { depth: usize },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type DetectionResult<T> = Result<T, DetectionError>;
