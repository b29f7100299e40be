//! Page integration
//!
//! Locates the search form and the content container in the site's page,
//! and provides the regions views are mounted into.

mod region;

pub use region::{BufferRegion, ContentRegion};

use crate::config::SiteSettings;
use anyhow::{anyhow, Result};
use scraper::{Html, Selector};
use tracing::{debug, info};

/// Name of the query input when the page does not give one
const DEFAULT_INPUT_NAME: &str = "query";

/// The page split around its content container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageShell {
    before: String,
    after: String,
}

impl PageShell {
    /// The page with `content` as the container's entire inner HTML
    pub fn wrap(&self, content: &str) -> String {
        let mut page = String::with_capacity(self.before.len() + content.len() + self.after.len());
        page.push_str(&self.before);
        page.push_str(content);
        page.push_str(&self.after);
        page
    }
}

/// A page whose search form was found
#[derive(Debug, Clone)]
pub struct SearchBinding {
    /// `name` of the query input, i.e. the submitted parameter
    pub input_name: String,
    /// The form's `action` attribute, if any
    pub form_action: Option<String>,
    pub shell: PageShell,
}

/// Finds the search form, its input and the content container
pub struct FormBinder {
    form: Selector,
    input: Selector,
    content: Selector,
}

impl FormBinder {
    pub fn new(site: &SiteSettings) -> Result<Self> {
        Ok(Self {
            form: parse_selector(&site.form_selector)?,
            input: parse_selector(&site.input_selector)?,
            content: parse_selector(&format!("[id=\"{}\"]", site.content_id))?,
        })
    }

    /// Bind to `page_html`.
    ///
    /// Returns `None`, after logging, when the form, its input or the
    /// content container is missing: the page simply has no search.
    pub fn bind(&self, page_html: &str) -> Option<SearchBinding> {
        let document = Html::parse_document(page_html);

        let Some(form) = document.select(&self.form).next() else {
            info!("Search form not found, search disabled");
            return None;
        };
        let Some(input) = form.select(&self.input).next() else {
            info!("Search input not found, search disabled");
            return None;
        };
        let Some(content) = document.select(&self.content).next() else {
            info!("Content container not found, search disabled");
            return None;
        };

        let input_name = input
            .value()
            .attr("name")
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_INPUT_NAME)
            .to_string();
        let form_action = form.value().attr("action").map(str::to_string);

        let page = document.html();
        let outer = content.html();
        let inner = content.inner_html();
        let close = format!("</{}>", content.value().name());

        let Some(open_len) = outer.len().checked_sub(inner.len() + close.len()) else {
            info!("Content container could not be split, search disabled");
            return None;
        };
        let Some(start) = page.find(&outer) else {
            info!("Content container could not be located, search disabled");
            return None;
        };

        let end = start + outer.len();
        let shell = PageShell {
            before: format!("{}{}", &page[..start], &outer[..open_len]),
            after: format!("{}{}", close, &page[end..]),
        };

        debug!("Search form bound with input '{}'", input_name);

        Some(SearchBinding {
            input_name,
            form_action,
            shell,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("invalid selector '{}': {:?}", selector, e))
}
