use logos_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Line {line}: head {head} is not a token of this sentence")]
    UnknownHead { line: usize, head: u32 },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type ParseResult<T> = Result<T, ParseError>;
