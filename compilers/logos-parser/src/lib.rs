//! Graph ingestion: reads the CoNLL-X output of an external dependency parser.

pub mod error;
pub mod parser;
pub mod sentence;

pub use error::{ParseError, ParseResult};
pub use sentence::{parse_document, parse_sentence, sentences, Sentence, Sentences};
