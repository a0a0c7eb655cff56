#![no_std] // Critical for embedded compatibility

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod ids;
pub mod model;
pub mod relation;

// Re-export core types for convenience
pub use config::{Configuration, ConfigurationError, Switches};
pub use ids::{SentenceId, TokenId};
pub use model::{Lexicon, Token};
pub use relation::{contains_ancestor, Relation};
