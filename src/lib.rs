//! Connected components of undirected graphs by label propagation.
//!
//! Graphs are loaded from Matrix Market files into an immutable CSR layout
//! ([`types::CSRGraph`]) and labelled by a min-label fixed-point iteration
//! ([`algorithms::cc`]). The same iteration is driven by four execution
//! strategies: a sequential scan, fresh scoped threads over contiguous
//! chunks, a rayon team with a static schedule and rayon work stealing.

pub mod algorithms;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod types;

pub use algorithms::cc::{CCConfig, CCController, CCResult, Propagation, StrategyKind, CC};
pub use algorithms::count::count_components;
pub use error::{CCError, GraphError, LoadError};
pub use types::CSRGraph;
