//! Rendering of views to HTML
//!
//! All query text, titles, URLs and error messages are escaped. Excerpts are
//! passed through as the engine produced them unless excerpt trust is turned
//! off, in which case they are escaped as well.

mod templates;
mod view;

pub use templates::Templates;
pub use view::{SuggestionView, View, ViewKind};

use crate::search::ResultRecord;
use anyhow::Result;
use serde::Serialize;
use tera::Context;
use tracing::error;

#[derive(Serialize)]
struct RecordContext<'a> {
    url: &'a str,
    title: &'a str,
    excerpt: String,
}

/// Produces HTML for views
pub struct Renderer {
    templates: Templates,
    trust_excerpts: bool,
    home_url: String,
}

impl Renderer {
    pub fn new(trust_excerpts: bool) -> Result<Self> {
        Ok(Self {
            templates: Templates::new()?,
            trust_excerpts,
            home_url: "/".to_string(),
        })
    }

    /// Link target of the "return to the home page" hint
    pub fn with_home_url(mut self, home_url: impl Into<String>) -> Self {
        self.home_url = home_url.into();
        self
    }

    /// Render a view, falling back to a bare message if a template fails
    pub fn render(&self, view: &View) -> String {
        self.try_render(view).unwrap_or_else(|e| {
            error!("Template error: {:#}", e);
            fallback(view)
        })
    }

    /// Render the suggestion box; hidden renders as an empty fragment
    pub fn render_suggestions(&self, view: &SuggestionView) -> String {
        let records = match view {
            SuggestionView::Hidden => return String::new(),
            SuggestionView::Shown(records) => records,
        };

        let mut ctx = Context::new();
        ctx.insert("records", &self.record_contexts(records));
        self.templates
            .render_with_context("suggestions.html", &ctx)
            .unwrap_or_else(|e| {
                error!("Template error: {:#}", e);
                String::new()
            })
    }

    fn try_render(&self, view: &View) -> Result<String> {
        let mut ctx = Context::new();
        let template = match view {
            View::Loading => "loading.html",
            View::Empty { query } => {
                ctx.insert("query", query);
                "empty.html"
            }
            View::Error { message } => {
                ctx.insert("message", message);
                ctx.insert("home_url", &self.home_url);
                "error.html"
            }
            View::Results {
                query,
                total,
                records,
            } => {
                ctx.insert("query", query);
                ctx.insert("total", total);
                ctx.insert("records", &self.record_contexts(records));
                ctx.insert("hidden", &view.hidden());
                "results.html"
            }
        };

        self.templates.render_with_context(template, &ctx)
    }

    fn record_contexts<'a>(&self, records: &'a [ResultRecord]) -> Vec<RecordContext<'a>> {
        records
            .iter()
            .map(|record| RecordContext {
                url: &record.url,
                title: &record.title,
                excerpt: if self.trust_excerpts {
                    record.excerpt.clone()
                } else {
                    tera::escape_html(&record.excerpt)
                },
            })
            .collect()
    }
}

fn fallback(view: &View) -> String {
    let message = match view {
        View::Error { message } => message.as_str(),
        _ => "Search results could not be displayed.",
    };
    format!("<p class=\"search-error\">{}</p>", tera::escape_html(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Query;

    fn renderer() -> Renderer {
        Renderer::new(true).unwrap()
    }

    fn records(count: usize) -> Vec<ResultRecord> {
        (1..=count)
            .map(|n| ResultRecord::new(format!("/docs/p{}.htm", n), format!("Page {}", n)))
            .collect()
    }

    fn results_view(total: usize, shown: usize) -> View {
        View::Results {
            query: Query::parse("page").unwrap(),
            total,
            records: records(shown),
        }
    }

    fn entries(html: &str) -> usize {
        html.matches("class=\"search-result-item\"").count()
    }

    #[test]
    fn test_capped_results_show_notice() {
        let html = renderer().render(&results_view(35, 30));
        assert_eq!(entries(&html), 30);
        assert!(html.contains("5 more results not shown"));
        assert!(html.contains("<strong>35</strong>"));
    }

    #[test]
    fn test_full_page_has_no_notice() {
        let html = renderer().render(&results_view(30, 30));
        assert_eq!(entries(&html), 30);
        assert!(!html.contains("not shown"));
    }

    #[test]
    fn test_single_hidden_result() {
        let html = renderer().render(&results_view(31, 30));
        assert!(html.contains("1 more result not shown"));
    }

    #[test]
    fn test_query_is_escaped() {
        let view = View::Empty {
            query: Query::parse("<script>alert(1)</script>").unwrap(),
        };
        let html = renderer().render(&view);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_error_message_is_escaped() {
        let view = View::Error {
            message: "bad <b>bundle</b>".to_string(),
        };
        let html = renderer().render(&view);
        assert!(html.contains("bad &lt;b&gt;bundle&lt;"));
        assert!(html.contains("search-error"));
        assert!(html.contains(&format!("href=\"{}\"", tera::escape_html("/"))));
    }

    #[test]
    fn test_error_links_configured_home() {
        let view = View::Error {
            message: "offline".to_string(),
        };
        let home = "/IFC/RELEASE/IFC4x3/HTML/";
        let html = renderer().with_home_url(home).render(&view);
        assert!(html.contains(&format!("href=\"{}\"", tera::escape_html(home))));
    }

    #[test]
    fn test_title_and_excerpt_handling() {
        let record = ResultRecord::from(
            crate::engine::ResultData::new("/x/IfcWall.htm")
                .with_excerpt("the <mark>wall</mark> <img src=x>"),
        );
        let view = View::Results {
            query: Query::parse("wall").unwrap(),
            total: 1,
            records: vec![record.clone()],
        };

        let trusted = renderer().render(&view);
        assert!(trusted.contains(">IfcWall</a>"));
        assert!(trusted.contains("the <mark>wall</mark>"));

        let untrusted = Renderer::new(false).unwrap().render(&view);
        assert!(untrusted.contains("the &lt;mark&gt;wall"));
        assert!(!untrusted.contains("<img"));
    }

    #[test]
    fn test_malicious_title_is_escaped() {
        let view = View::Results {
            query: Query::parse("x").unwrap(),
            total: 1,
            records: vec![ResultRecord::new("/x.htm", "<script>x()</script>")],
        };
        let html = renderer().render(&view);
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_loading_view() {
        let html = renderer().render(&View::Loading);
        assert!(html.contains("search-loading"));
    }

    #[test]
    fn test_suggestions() {
        let r = renderer();
        assert_eq!(r.render_suggestions(&SuggestionView::Hidden), "");

        let html = r.render_suggestions(&SuggestionView::Shown(records(3)));
        assert_eq!(html.matches("class=\"search-suggestion\"").count(), 3);
        assert!(html.contains("Page 2"));
    }
}
