//! HTTP client for fetching search bundle assets

use crate::config::OutgoingSettings;
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper configured from the `outgoing` settings
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        Ok(Self {
            client: builder.build()?,
            user_agent: format!("docsearch/{}", crate::VERSION),
        })
    }

    /// GET a JSON document
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_json_with_params(url, &[]).await
    }

    /// GET a JSON document with query parameters
    pub async fn get_json_with_params<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json");

        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        Self::parse_json(response).await
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let url = response.url().to_string();

        if !status.is_success() {
            anyhow::bail!("HTTP error {} from {}", status.as_u16(), url);
        }

        let text = response.text().await?;
        serde_json::from_str(&text).with_context(|| format!("malformed JSON from {}", url))
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
