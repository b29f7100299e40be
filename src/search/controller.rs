//! Search controller: runs queries and mounts the resulting views

use super::models::{Query, ResultRecord};
use super::ranker::rank;
use crate::config::SearchSettings;
use crate::engine::{LibraryLoader, LoadError, SearchResponse};
use crate::metrics::Metrics;
use crate::page::{BufferRegion, ContentRegion};
use crate::render::{Renderer, SuggestionView, View, ViewKind};
use futures::future::join_all;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure while answering a query
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The engine failed to run the query
    #[error("search failed: {0}")]
    Query(String),
    /// A match could not be resolved to its page data
    #[error("unable to read search result: {0}")]
    Resolve(String),
}

/// What happened to a submitted query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank input; nothing was done
    Ignored,
    /// The final view was mounted
    Rendered(ViewKind),
    /// A newer query started first; this one's view was discarded
    Superseded,
}

/// What happened to a suggestion request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestOutcome {
    Disabled,
    Hidden,
    Shown(usize),
    Superseded,
}

/// Sequences loader, engine, ranker and renderer for one page.
///
/// Each `search` call takes a generation token; only the newest token may
/// mount a view, so overlapping searches cannot clobber each other.
pub struct SearchController {
    loader: Arc<LibraryLoader>,
    renderer: Arc<Renderer>,
    content: Arc<dyn ContentRegion>,
    suggestions: Arc<dyn ContentRegion>,
    settings: SearchSettings,
    metrics: Arc<Metrics>,
    generation: Mutex<u64>,
    suggestion_generation: Arc<Mutex<u64>>,
}

impl SearchController {
    pub fn new(
        loader: Arc<LibraryLoader>,
        renderer: Arc<Renderer>,
        content: Arc<dyn ContentRegion>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            loader,
            renderer,
            content,
            suggestions: Arc::new(BufferRegion::new()),
            settings,
            metrics: Arc::new(Metrics::new()),
            generation: Mutex::new(0),
            suggestion_generation: Arc::new(Mutex::new(0)),
        }
    }

    /// Region the suggestion box is mounted into
    pub fn with_suggestion_region(mut self, region: Arc<dyn ContentRegion>) -> Self {
        self.suggestions = region;
        self
    }

    /// Share the suggestion counter with other controllers, so a newer
    /// request from any of them supersedes a pending one here
    pub fn with_suggestion_generation(mut self, generation: Arc<Mutex<u64>>) -> Self {
        self.suggestion_generation = generation;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Run a search and mount its view.
    ///
    /// Never fails: errors are rendered as the error view.
    pub async fn search(&self, raw: &str) -> SearchOutcome {
        let Some(query) = Query::parse(raw) else {
            return SearchOutcome::Ignored;
        };

        let token = {
            let mut generation = self.generation.lock();
            *generation += 1;
            *generation
        };
        self.metrics.inc_search();
        debug!("Search #{}: '{}'", token, query);

        self.show(token, &View::Loading);

        let view = match self.execute(&query).await {
            Ok(view) => view,
            Err(e) => {
                warn!("Search for '{}' failed: {}", query, e);
                View::Error {
                    message: e.to_string(),
                }
            }
        };

        // superseded searches only count as superseded
        let outcome = self.show(token, &view);
        match outcome {
            SearchOutcome::Rendered(ViewKind::Empty) => self.metrics.inc_empty(),
            SearchOutcome::Rendered(ViewKind::Error) => self.metrics.inc_failed(),
            _ => {}
        }
        outcome
    }

    async fn execute(&self, query: &Query) -> Result<View, SearchError> {
        let engine = self.loader.ensure_loaded().await?;
        let response = engine
            .search(query.as_str())
            .await
            .map_err(|e| SearchError::Query(format!("{:#}", e)))?;

        info!("Search '{}' matched {} pages", query, response.len());

        if response.is_empty() {
            return Ok(View::Empty {
                query: query.clone(),
            });
        }

        let records = resolve(&response, self.settings.max_results).await?;
        let records = if self.settings.rerank {
            rank(query.as_str(), records)
        } else {
            records
        };

        Ok(View::Results {
            query: query.clone(),
            total: response.len(),
            records,
        })
    }

    /// Mount `view` if `token` is still the newest search
    fn show(&self, token: u64, view: &View) -> SearchOutcome {
        // held while mounting so a newer search cannot slip in between
        let generation = self.generation.lock();
        if *generation != token {
            debug!("Search #{} superseded by #{}", token, *generation);
            self.metrics.inc_superseded();
            return SearchOutcome::Superseded;
        }

        self.content.mount(self.renderer.render(view));
        SearchOutcome::Rendered(view.kind())
    }

    /// Update the suggestion box for partially typed input.
    ///
    /// Short input hides the box at once; otherwise the request waits out
    /// the debounce period and is dropped if a newer one arrived meanwhile.
    pub async fn suggest(&self, raw: &str) -> SuggestOutcome {
        let settings = &self.settings.suggestions;
        if !settings.enabled {
            return SuggestOutcome::Disabled;
        }

        let token = {
            let mut generation = self.suggestion_generation.lock();
            *generation += 1;
            *generation
        };

        let Some(query) = Query::parse(raw).filter(|q| q.char_len() >= settings.min_chars) else {
            return self.show_suggestions(token, SuggestionView::Hidden);
        };

        if settings.debounce_ms > 0 {
            tokio::time::sleep(Duration::from_millis(settings.debounce_ms)).await;
            if *self.suggestion_generation.lock() != token {
                return SuggestOutcome::Superseded;
            }
        }

        let view = match self.suggestion_view(&query).await {
            Ok(view) => view,
            Err(e) => {
                warn!("Suggestions for '{}' failed: {}", query, e);
                SuggestionView::Hidden
            }
        };

        self.show_suggestions(token, view)
    }

    async fn suggestion_view(&self, query: &Query) -> Result<SuggestionView, SearchError> {
        let engine = self.loader.ensure_loaded().await?;
        let response = engine
            .search(query.as_str())
            .await
            .map_err(|e| SearchError::Query(format!("{:#}", e)))?;

        if response.is_empty() {
            return Ok(SuggestionView::Hidden);
        }

        let records = resolve(&response, self.settings.suggestions.max_results).await?;
        Ok(SuggestionView::Shown(records))
    }

    fn show_suggestions(&self, token: u64, view: SuggestionView) -> SuggestOutcome {
        let generation = self.suggestion_generation.lock();
        if *generation != token {
            return SuggestOutcome::Superseded;
        }

        match view {
            SuggestionView::Hidden => {
                self.suggestions.hide();
                SuggestOutcome::Hidden
            }
            SuggestionView::Shown(ref records) => {
                self.metrics.inc_suggestions();
                self.suggestions.mount(self.renderer.render_suggestions(&view));
                SuggestOutcome::Shown(records.len())
            }
        }
    }
}

/// Resolve the first `limit` matches concurrently, keeping engine order
async fn resolve(response: &SearchResponse, limit: usize) -> Result<Vec<ResultRecord>, SearchError> {
    let resolved = join_all(response.results.iter().take(limit).map(|handle| handle.data())).await;

    resolved
        .into_iter()
        .map(|data| {
            data.map(ResultRecord::from)
                .map_err(|e| SearchError::Resolve(format!("{:#}", e)))
        })
        .collect()
}
