//! Template rendering with Tera

use anyhow::Result;
use tera::{Context, Tera};

/// Template renderer with the view templates embedded
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Create a new template renderer with embedded templates.
    ///
    /// Names end in `.html`, so Tera autoescapes every interpolation unless a
    /// template opts out with `| safe`.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("loading.html", include_str!("../templates/loading.html")),
            ("empty.html", include_str!("../templates/empty.html")),
            ("error.html", include_str!("../templates/error.html")),
            ("results.html", include_str!("../templates/results.html")),
            ("suggestions.html", include_str!("../templates/suggestions.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with a Tera Context
    pub fn render_with_context(&self, template: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template, context)?)
    }
}
