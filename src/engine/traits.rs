//! Engine traits and types

use crate::config::EngineOptions;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Metadata attached to an indexed page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultMeta {
    /// Page title, when the index recorded one
    pub title: Option<String>,
}

/// Resolved data behind a result handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultData {
    /// Page URL
    pub url: String,
    /// Page metadata
    #[serde(default)]
    pub meta: ResultMeta,
    /// Highlighted excerpt, as HTML produced by the engine
    #[serde(default)]
    pub excerpt: String,
}

impl ResultData {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            meta: ResultMeta::default(),
            excerpt: String::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }
}

/// Opaque reference to a match, resolved lazily
#[async_trait]
pub trait ResultHandle: Send + Sync {
    /// Fetch the data behind this match
    async fn data(&self) -> anyhow::Result<ResultData>;
}

/// Matches for one query, in engine order
#[derive(Clone, Default)]
pub struct SearchResponse {
    pub results: Vec<Arc<dyn ResultHandle>>,
}

impl SearchResponse {
    pub fn new(results: Vec<Arc<dyn ResultHandle>>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A loaded search engine
#[async_trait]
pub trait EngineHandle: Send + Sync {
    /// Apply configuration; called once, right after loading
    async fn configure(&mut self, options: &EngineOptions) -> anyhow::Result<()>;

    /// Run a query
    async fn search(&self, query: &str) -> anyhow::Result<SearchResponse>;
}

/// Where an engine comes from
#[async_trait]
pub trait EngineSource: Send + Sync {
    /// Short description used in logs
    fn name(&self) -> &str;

    /// Fetch the engine asset and produce an unconfigured handle
    async fn load(&self) -> anyhow::Result<Box<dyn EngineHandle>>;
}
