//! Resolvers — message analysis, candidate shortlisting, heuristic ranking.
//!
//! Everything here is pure and synchronous. Model-assisted ranking and the
//! choice between strategies live in `mediapick-runtime`.

pub mod context;
pub mod filter;
pub mod heuristic;
pub mod scoring;
pub mod types;

pub use context::analyze;
pub use filter::{shortlist, Candidate};
pub use heuristic::HeuristicRanker;
pub use scoring::Signals;
pub use types::*;
