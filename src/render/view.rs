//! Views that can be mounted into the page

use crate::search::{Query, ResultRecord};

/// The single state shown in the content region
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// A search is running
    Loading,
    /// The engine found nothing
    Empty { query: Query },
    /// Loading or searching failed
    Error { message: String },
    /// Matches, capped to the display limit
    Results {
        query: Query,
        /// Number of matches the engine reported
        total: usize,
        /// Records shown, in display order
        records: Vec<ResultRecord>,
    },
}

impl View {
    /// Short name for logs
    pub fn kind(&self) -> ViewKind {
        match self {
            View::Loading => ViewKind::Loading,
            View::Empty { .. } => ViewKind::Empty,
            View::Error { .. } => ViewKind::Error,
            View::Results { .. } => ViewKind::Results,
        }
    }

    /// Matches the engine reported but that are not shown
    pub fn hidden(&self) -> usize {
        match self {
            View::Results { total, records, .. } => total.saturating_sub(records.len()),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Loading,
    Empty,
    Error,
    Results,
}

/// State of the type-ahead box
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionView {
    Hidden,
    Shown(Vec<ResultRecord>),
}
