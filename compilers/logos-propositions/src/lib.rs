pub mod error;
pub mod extractor;
pub mod generator;
pub mod proposition;
pub mod render;

pub use error::{GenerationError, GenerationResult};
pub use extractor::{Extraction, Extractor};
pub use generator::{generate_propositions, PropositionGenerator};
pub use proposition::Proposition;
pub use render::{render_span, span_words};
