//! Settings structures for docsearch configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings structure, loaded from `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub site: SiteSettings,
    pub engine: EngineSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (DOCSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("DOCSEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("DOCSEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("DOCSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("DOCSEARCH_SITE_ROOT") {
            self.site.root = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("DOCSEARCH_BUNDLE_URL") {
            self.engine.bundle_url = val;
        }
    }

    /// Path of the page the search form is bound from
    pub fn page_path(&self) -> PathBuf {
        self.site.root.join(&self.site.page)
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by the health endpoint
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "docsearch".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Route that receives search form submissions
    pub search_path: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
            search_path: "/search".to_string(),
        }
    }
}

/// Static site settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Directory holding the generated documentation site
    pub root: PathBuf,
    /// Page (relative to `root`) whose form and layout are used for results
    pub page: String,
    /// CSS selector of the search form
    pub form_selector: String,
    /// CSS selector of the query input, evaluated inside the form
    pub input_selector: String,
    /// Id of the element results are mounted into
    pub content_id: String,
    /// Home page link used by the error view and blank submissions
    pub home_url: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("site"),
            page: "index.html".to_string(),
            form_selector: "form.search".to_string(),
            input_selector: "input[name=\"query\"]".to_string(),
            content_id: "main-content".to_string(),
            home_url: "/".to_string(),
        }
    }
}

/// Search engine bundle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Base URL of the hosted search bundle
    pub bundle_url: String,
    /// Options passed through to the engine on initialization
    pub options: EngineOptions,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            bundle_url: "http://127.0.0.1:8080/pagefind/".to_string(),
            options: EngineOptions::default(),
        }
    }
}

/// Opaque engine configuration, handed to the engine as-is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Index language to search (first language in the bundle when unset)
    pub language: Option<String>,
    /// Prefix for relative result URLs
    pub base_url: Option<String>,
    /// Excerpt length in words
    pub excerpt_length: Option<u32>,
    /// Ranking weights
    pub ranking: RankingWeights,
}

/// Engine ranking weights
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub term_similarity: Option<f64>,
    pub page_length: Option<f64>,
    pub term_saturation: Option<f64>,
    pub term_frequency: Option<f64>,
}

impl RankingWeights {
    /// Weights that are set, as `(name, value)` pairs
    pub fn as_params(&self) -> Vec<(&'static str, f64)> {
        [
            ("term_similarity", self.term_similarity),
            ("page_length", self.page_length),
            ("term_saturation", self.term_saturation),
            ("term_frequency", self.term_frequency),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Maximum number of results rendered
    pub max_results: usize,
    /// Re-order results by title match
    pub rerank: bool,
    /// Emit engine excerpts without escaping
    pub trust_excerpts: bool,
    /// Type-ahead suggestions
    pub suggestions: SuggestionSettings,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 30,
            rerank: true,
            trust_excerpts: true,
            suggestions: SuggestionSettings::default(),
        }
    }
}

/// Suggestion box settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionSettings {
    pub enabled: bool,
    /// Minimum query length, in characters
    pub min_chars: usize,
    /// Maximum number of suggestions shown
    pub max_results: usize,
    /// Quiet period before a suggestion search runs
    pub debounce_ms: u64,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_chars: 2,
            max_results: 5,
            debounce_ms: 300,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.search.max_results, 30);
        assert_eq!(settings.search.suggestions.min_chars, 2);
        assert_eq!(settings.search.suggestions.max_results, 5);
        assert_eq!(settings.site.content_id, "main-content");
        assert_eq!(settings.site.home_url, "/");
        assert!(settings.search.trust_excerpts);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
site:
  root: /srv/docs
  home_url: /IFC/RELEASE/IFC4x3/HTML/
search:
  max_results: 10
engine:
  options:
    language: zh-cn
    ranking:
      page_length: 0.5
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.site.root, PathBuf::from("/srv/docs"));
        assert_eq!(settings.site.page, "index.html");
        assert_eq!(settings.site.home_url, "/IFC/RELEASE/IFC4x3/HTML/");
        assert_eq!(settings.search.max_results, 10);
        assert!(settings.search.rerank);
        assert_eq!(settings.engine.options.language.as_deref(), Some("zh-cn"));
        assert_eq!(
            settings.engine.options.ranking.as_params(),
            vec![("page_length", 0.5)]
        );
        assert_eq!(settings.page_path(), PathBuf::from("/srv/docs/index.html"));
    }
}
