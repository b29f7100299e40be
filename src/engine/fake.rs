//! In-memory engine used by unit tests

use super::traits::*;
use crate::config::EngineOptions;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Canned results per query, with optional delays and failures
#[derive(Clone, Default)]
pub struct FakeSource {
    results: HashMap<String, Vec<ResultData>>,
    search_delays: HashMap<String, Duration>,
    failing_queries: Vec<String>,
    failing_data: Vec<String>,
    load_delay: Duration,
    failing_loads: Arc<AtomicUsize>,
    reject_configuration: bool,
    loads: Arc<AtomicUsize>,
    searches: Arc<Mutex<Vec<String>>>,
    configured: Arc<Mutex<Vec<EngineOptions>>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, query: &str, results: Vec<ResultData>) -> Self {
        self.results.insert(query.to_string(), results);
        self
    }

    pub fn with_search_delay(mut self, query: &str, delay: Duration) -> Self {
        self.search_delays.insert(query.to_string(), delay);
        self
    }

    pub fn failing_query(mut self, query: &str) -> Self {
        self.failing_queries.push(query.to_string());
        self
    }

    /// Resolving the result with this URL fails
    pub fn failing_data(mut self, url: &str) -> Self {
        self.failing_data.push(url.to_string());
        self
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// The first `count` loads fail
    pub fn failing_loads(self, count: usize) -> Self {
        self.failing_loads.store(count, Ordering::SeqCst);
        self
    }

    pub fn rejecting_configuration(mut self) -> Self {
        self.reject_configuration = true;
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().clone()
    }

    pub fn configured_with(&self) -> Vec<EngineOptions> {
        self.configured.lock().clone()
    }
}

/// `count` pages titled `Page N` under `/docs/`
pub fn pages(count: usize) -> Vec<ResultData> {
    (1..=count)
        .map(|n| {
            ResultData::new(format!("/docs/page{}.htm", n))
                .with_title(format!("Page {}", n))
                .with_excerpt(format!("excerpt <mark>{}</mark>", n))
        })
        .collect()
}

#[async_trait]
impl EngineSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    async fn load(&self) -> anyhow::Result<Box<dyn EngineHandle>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }

        let remaining = self.failing_loads.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_loads.store(remaining - 1, Ordering::SeqCst);
            anyhow::bail!("bundle unreachable");
        }

        Ok(Box::new(FakeEngine {
            source: self.clone(),
        }))
    }
}

struct FakeEngine {
    source: FakeSource,
}

#[async_trait]
impl EngineHandle for FakeEngine {
    async fn configure(&mut self, options: &EngineOptions) -> anyhow::Result<()> {
        self.source.configured.lock().push(options.clone());
        if self.source.reject_configuration {
            anyhow::bail!("unsupported options");
        }
        Ok(())
    }

    async fn search(&self, query: &str) -> anyhow::Result<SearchResponse> {
        self.source.searches.lock().push(query.to_string());
        if let Some(delay) = self.source.search_delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.source.failing_queries.iter().any(|q| q == query) {
            anyhow::bail!("index fragment missing");
        }

        let results = self
            .source
            .results
            .get(query)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|data| {
                let fails = self.source.failing_data.contains(&data.url);
                Arc::new(FakeHandle { data, fails }) as Arc<dyn ResultHandle>
            })
            .collect();

        Ok(SearchResponse::new(results))
    }
}

struct FakeHandle {
    data: ResultData,
    fails: bool,
}

#[async_trait]
impl ResultHandle for FakeHandle {
    async fn data(&self) -> anyhow::Result<ResultData> {
        if self.fails {
            anyhow::bail!("fragment {} unavailable", self.data.url);
        }
        Ok(self.data.clone())
    }
}
