pub mod clause;
pub mod constituent;
pub mod coordination;
pub mod detector;
pub mod error;

pub use clause::{Clause, ClauseType, Flag};
pub use constituent::{Constituent, Role, Span};
pub use coordination::{alternatives, coordinated_heads};
pub use detector::{detect_clauses, ClauseDetector, MAX_NESTING};
pub use error::{DetectionError, DetectionResult};
