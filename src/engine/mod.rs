//! Search engine module
//!
//! Defines the engine contract, the loader that brings an engine up exactly
//! once, and the HTTP bundle implementation.

mod loader;
mod pagefind;
mod traits;

#[cfg(test)]
pub(crate) mod fake;

pub use loader::{LibraryLoader, LoadError, LoaderStatus};
pub use pagefind::{EntryManifest, LanguageEntry, PagefindEngine, PagefindSource};
pub use traits::*;
