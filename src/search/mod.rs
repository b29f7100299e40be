//! Search orchestration module
//!
//! Runs queries against the loaded engine, re-ranks the matches and mounts
//! the resulting views.

mod controller;
mod models;
mod ranker;

pub use controller::{SearchController, SearchError, SearchOutcome, SuggestOutcome};
pub use models::*;
pub use ranker::rank;
