pub mod graph;
pub mod positional;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use graph::{
    find_first, find_first_descendant, DependencyEdge, DependencyGraph, GraphError, GraphResult,
};
pub use positional::{binds_pair, shares_dependent};
