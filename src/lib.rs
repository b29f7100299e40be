//! docsearch: search for static documentation sites
//!
//! Wires a site's search form to a Pagefind-style search bundle. The engine
//! owns all indexing and relevance; this crate loads it once, runs queries,
//! optionally re-ranks matches by title, and renders the result views into
//! the site's content area.

pub mod config;
pub mod engine;
pub mod metrics;
pub mod network;
pub mod page;
pub mod render;
pub mod search;
pub mod web;

pub use config::Settings;
pub use engine::{EngineHandle, EngineSource, LibraryLoader};
pub use search::{SearchController, SearchOutcome};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
