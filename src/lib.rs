//! Reassembles a DNA sequence from redundant shotgun fragments.
//!
//! The pipeline drops fragments contained in others, discards fragments read
//! from the opposite strand, scores every ordered pair for an error-tolerant
//! suffix/prefix overlap, and searches for the fragment order with the most
//! chained overlap.

pub mod config;
pub mod error;
pub mod filter;
pub mod fragment;
pub mod graph;
pub mod io;
pub mod layout;
pub mod optimizer;
pub mod overlap;
pub mod pipeline;
pub mod strand;

pub use config::{AssemblyArgs, AssemblyConfig, StrategyKind};
pub use error::{AssemblyError, Result};
pub use filter::{dedupe, filter_min_length};
pub use fragment::{reverse_complement, Fragment};
pub use graph::{build_matrices, OverlapGraph, WeightMatrix};
pub use layout::{Layout, Placement};
pub use optimizer::{optimize, GaParams, RunContext, Solution, Strategy, Tour};
pub use overlap::{score, ErrorModel, OverlapScore, ScoringConfig};
pub use pipeline::{assemble, run, AssemblyOutput};
pub use strand::{classify_strands, classify_until_stable, Classification};
