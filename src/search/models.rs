//! Search data models

use crate::engine::ResultData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trimmed, non-empty query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Trim `raw`; `None` when nothing is left
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A resolved match, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub url: String,
    pub title: String,
    /// Engine-provided excerpt HTML
    pub excerpt: String,
}

impl ResultRecord {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            excerpt: String::new(),
        }
    }
}

impl From<ResultData> for ResultRecord {
    fn from(data: ResultData) -> Self {
        let title = data
            .meta
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| title_from_url(&data.url));

        Self {
            url: data.url,
            title,
            excerpt: data.excerpt,
        }
    }
}

/// Derive a title from the last path segment of `url`, minus its extension.
///
/// `/x/IfcWall.htm` gives `IfcWall`. Falls back to the URL itself when no
/// usable segment exists.
pub fn title_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let stem = match segment.rfind('.') {
        Some(dot) if dot > 0 => &segment[..dot],
        _ => segment,
    };

    if stem.is_empty() {
        url.to_string()
    } else {
        stem.to_string()
    }
}
