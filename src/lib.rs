//! Find files whose names and contents satisfy boolean expressions.

pub mod cli;
pub mod content;
mod search;

pub use search::{CandidateSource, SearchConfig, collect_candidates, search};
