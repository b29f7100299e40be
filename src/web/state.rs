//! Application state shared across handlers

use crate::config::Settings;
use crate::engine::{EngineSource, LibraryLoader};
use crate::metrics::Metrics;
use crate::page::{ContentRegion, SearchBinding};
use crate::render::Renderer;
use crate::search::SearchController;
use moka::future::Cache;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Engine loader, shared so the engine loads once per process
    pub loader: Arc<LibraryLoader>,
    /// View renderer
    pub renderer: Arc<Renderer>,
    /// Bound search form; `None` disables search
    pub binding: Option<Arc<SearchBinding>>,
    /// Search counters
    pub metrics: Arc<Metrics>,
    /// Suggestion generation per client, outliving single requests
    suggestion_generations: Cache<String, Arc<Mutex<u64>>>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        settings: Settings,
        source: Arc<dyn EngineSource>,
        binding: Option<SearchBinding>,
    ) -> anyhow::Result<Self> {
        let loader = Arc::new(LibraryLoader::new(source, settings.engine.options.clone()));
        let renderer = Arc::new(
            Renderer::new(settings.search.trust_excerpts)?.with_home_url(&settings.site.home_url),
        );

        Ok(Self {
            settings: Arc::new(settings),
            loader,
            renderer,
            binding: binding.map(Arc::new),
            metrics: Arc::new(Metrics::new()),
            suggestion_generations: Cache::builder()
                .max_capacity(10_000)
                .time_to_idle(Duration::from_secs(600))
                .build(),
        })
    }

    /// Controller mounting into the given regions
    pub fn controller(
        &self,
        content: Arc<dyn ContentRegion>,
        suggestions: Arc<dyn ContentRegion>,
    ) -> SearchController {
        SearchController::new(
            self.loader.clone(),
            self.renderer.clone(),
            content,
            self.settings.search.clone(),
        )
        .with_suggestion_region(suggestions)
        .with_metrics(self.metrics.clone())
    }

    /// Suggestion counter shared by every request from `client`
    pub async fn suggestion_generation(&self, client: &str) -> Arc<Mutex<u64>> {
        self.suggestion_generations
            .get_with(client.to_string(), async { Arc::new(Mutex::new(0)) })
            .await
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
