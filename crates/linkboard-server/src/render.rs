//! HTML rendering
//!
//! Implements the core's opaque `Renderer` with minijinja templates embedded
//! at compile time. The home page is the cached artifact; the admin page is
//! rendered per request and never cached.

use linkboard_core::{PageContext, RenderError, Renderer};
use minijinja::{context, Environment};

const HOME_TEMPLATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/home.html"));
const ADMIN_TEMPLATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/admin.html"));

/// Prefill values for the "new link" form after a metadata fetch
#[derive(Debug, Clone, Default)]
pub struct OgPrefill {
    pub url: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

/// Everything the admin template needs for one response
pub struct AdminView<'a> {
    pub page: &'a PageContext,
    pub error: Option<String>,
    pub success: Option<String>,
    pub prefill: OgPrefill,
}

impl<'a> AdminView<'a> {
    pub fn new(page: &'a PageContext) -> Self {
        Self {
            page,
            error: None,
            success: None,
            prefill: OgPrefill::default(),
        }
    }

    pub fn with_error(page: &'a PageContext, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new(page)
        }
    }

    pub fn with_success(page: &'a PageContext, message: impl Into<String>) -> Self {
        Self {
            success: Some(message.into()),
            ..Self::new(page)
        }
    }
}

/// Template-backed renderer for both pages
pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.add_template("home", HOME_TEMPLATE)
            .map_err(|e| RenderError::new(e.to_string()))?;
        env.add_template("admin", ADMIN_TEMPLATE)
            .map_err(|e| RenderError::new(e.to_string()))?;
        Ok(Self { env })
    }

    pub fn render_admin(&self, view: &AdminView<'_>) -> Result<String, RenderError> {
        let tmpl = self
            .env
            .get_template("admin")
            .map_err(|e| RenderError::new(e.to_string()))?;
        tmpl.render(context! {
            page => view.page,
            error => view.error,
            success => view.success,
            ogp_url => view.prefill.url,
            ogp_title => view.prefill.title,
            ogp_description => view.prefill.description,
            ogp_image => view.prefill.image_url,
        })
        .map_err(|e| RenderError::new(e.to_string()))
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, ctx: &PageContext) -> Result<Vec<u8>, RenderError> {
        let tmpl = self
            .env
            .get_template("home")
            .map_err(|e| RenderError::new(e.to_string()))?;
        let html = tmpl
            .render(ctx)
            .map_err(|e| RenderError::new(e.to_string()))?;
        Ok(html.into_bytes())
    }
}
