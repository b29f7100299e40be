//! Engine backed by a hosted Pagefind-style bundle
//!
//! Layout of the bundle, relative to its base URL:
//! - `pagefind-entry.json`: version and the languages the bundle indexes
//! - `search?q=...`: ordered matches, `{"results": [{"id": ..}]}`
//! - `fragment/{id}.json`: page data for one match

use super::traits::*;
use crate::config::EngineOptions;
use crate::network::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Entry manifest published at the root of the bundle
#[derive(Debug, Clone, Deserialize)]
pub struct EntryManifest {
    pub version: String,
    pub languages: BTreeMap<String, LanguageEntry>,
}

/// One indexed language
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageEntry {
    #[serde(default)]
    pub page_count: u64,
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: String,
}

/// Loads the engine from a bundle URL
pub struct PagefindSource {
    client: HttpClient,
    bundle_url: Url,
}

impl PagefindSource {
    pub fn new(client: HttpClient, bundle_url: &str) -> Result<Self> {
        let mut bundle_url =
            Url::parse(bundle_url).with_context(|| format!("invalid bundle URL {}", bundle_url))?;
        // Url::join drops the last segment unless the path ends with '/'
        if !bundle_url.path().ends_with('/') {
            let path = format!("{}/", bundle_url.path());
            bundle_url.set_path(&path);
        }

        Ok(Self { client, bundle_url })
    }

    pub fn bundle_url(&self) -> &Url {
        &self.bundle_url
    }
}

#[async_trait]
impl EngineSource for PagefindSource {
    fn name(&self) -> &str {
        self.bundle_url.as_str()
    }

    async fn load(&self) -> Result<Box<dyn EngineHandle>> {
        let entry_url = self.bundle_url.join("pagefind-entry.json")?;
        let manifest: EntryManifest = self
            .client
            .get_json(entry_url.as_str())
            .await
            .context("fetching entry manifest")?;

        if manifest.languages.is_empty() {
            anyhow::bail!("bundle {} indexes no languages", self.bundle_url);
        }

        info!(
            "Bundle version {} indexes {}",
            manifest.version,
            manifest
                .languages
                .iter()
                .map(|(code, entry)| format!("{} ({} pages)", code, entry.page_count))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Box::new(PagefindEngine {
            manifest,
            search_url: self.bundle_url.join("search")?,
            params: Vec::new(),
            fragments: Arc::new(Fragments {
                client: self.client.clone(),
                bundle_url: self.bundle_url.clone(),
                base_url: None,
                cache: Cache::builder().max_capacity(10_000).build(),
            }),
        }))
    }
}

/// A loaded bundle
pub struct PagefindEngine {
    manifest: EntryManifest,
    search_url: Url,
    params: Vec<(String, String)>,
    fragments: Arc<Fragments>,
}

impl PagefindEngine {
    fn pick_language(&self, requested: Option<&str>) -> Result<String> {
        let available = &self.manifest.languages;
        match requested {
            None => available
                .keys()
                .next()
                .cloned()
                .context("bundle indexes no languages"),
            Some(lang) if available.contains_key(lang) => Ok(lang.to_string()),
            Some(lang) => {
                // "zh" matches an index built for "zh-cn"
                let base = lang.split('-').next().unwrap_or(lang);
                available
                    .keys()
                    .find(|code| code.split('-').next() == Some(base))
                    .cloned()
                    .with_context(|| {
                        format!(
                            "language {} not in bundle (available: {})",
                            lang,
                            available.keys().cloned().collect::<Vec<_>>().join(", ")
                        )
                    })
            }
        }
    }
}

#[async_trait]
impl EngineHandle for PagefindEngine {
    async fn configure(&mut self, options: &EngineOptions) -> Result<()> {
        let language = self.pick_language(options.language.as_deref())?;

        let mut params = vec![("language".to_string(), language)];
        if let Some(length) = options.excerpt_length {
            params.push(("excerpt_length".to_string(), length.to_string()));
        }
        for (name, value) in options.ranking.as_params() {
            params.push((format!("ranking.{}", name), value.to_string()));
        }
        self.params = params;

        if let Some(ref base_url) = options.base_url {
            let fragments = Arc::get_mut(&mut self.fragments)
                .context("engine configured after results were handed out")?;
            fragments.base_url = Some(base_url.trim_end_matches('/').to_string());
        }

        Ok(())
    }

    async fn search(&self, query: &str) -> Result<SearchResponse> {
        let mut params = vec![("q".to_string(), query.to_string())];
        params.extend(self.params.iter().cloned());

        let payload: SearchPayload = self
            .fragments
            .client
            .get_json_with_params(self.search_url.as_str(), &params)
            .await
            .context("search request failed")?;

        debug!("Bundle returned {} matches for '{}'", payload.results.len(), query);

        let results = payload
            .results
            .into_iter()
            .map(|hit| {
                Arc::new(PagefindResult {
                    id: hit.id,
                    fragments: self.fragments.clone(),
                }) as Arc<dyn ResultHandle>
            })
            .collect();

        Ok(SearchResponse::new(results))
    }
}

/// Fragment fetching shared by the engine and its result handles
struct Fragments {
    client: HttpClient,
    bundle_url: Url,
    base_url: Option<String>,
    cache: Cache<String, ResultData>,
}

impl Fragments {
    async fn fetch(&self, id: &str) -> Result<ResultData> {
        if let Some(data) = self.cache.get(id).await {
            return Ok(data);
        }

        let url = self.bundle_url.join(&format!("fragment/{}.json", id))?;
        let mut data: ResultData = self
            .client
            .get_json(url.as_str())
            .await
            .with_context(|| format!("fetching fragment {}", id))?;

        if let Some(ref base) = self.base_url {
            if data.url.starts_with('/') {
                data.url = format!("{}{}", base, data.url);
            }
        }

        self.cache.insert(id.to_string(), data.clone()).await;
        Ok(data)
    }
}

struct PagefindResult {
    id: String,
    fragments: Arc<Fragments>,
}

#[async_trait]
impl ResultHandle for PagefindResult {
    async fn data(&self) -> Result<ResultData> {
        self.fragments.fetch(&self.id).await
    }
}
