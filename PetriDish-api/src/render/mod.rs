//! HTML rendering for the intake pages
//!
//! Templates are compiled into the binary and looked up by file name, so
//! handlers only pick a template and hand over a context.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Registration form
pub const FORM_TEMPLATE: &str = "form.html";
/// Confirmation after registering a patient
pub const SUCCESS_TEMPLATE: &str = "success.html";
/// Raw listing of every stored document
pub const DATA_TEMPLATE: &str = "data.html";
/// Blood pressure readings and entry form
pub const DASHBOARD_TEMPLATE: &str = "dashboard.html";

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    (FORM_TEMPLATE, include_str!("../../templates/form.html")),
    (SUCCESS_TEMPLATE, include_str!("../../templates/success.html")),
    (DATA_TEMPLATE, include_str!("../../templates/data.html")),
    (DASHBOARD_TEMPLATE, include_str!("../../templates/dashboard.html")),
];

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        error!("Failed to render page: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
    }
}

/// Renders a named template with a data bag
#[derive(Debug)]
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Load the bundled templates. HTML templates are auto-escaped.
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(*name, *source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(
        &self,
        name: &str,
        context: S,
    ) -> Result<Html<String>, RenderError> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(context)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_load() {
        let renderer = TemplateRenderer::new().unwrap();
        for (name, _) in TEMPLATES {
            assert!(renderer.env.get_template(*name).is_ok(), "missing template {}", name);
        }
    }

    #[test]
    fn test_form_renders_with_empty_context() {
        let renderer = TemplateRenderer::new().unwrap();
        let Html(page) = renderer.render(FORM_TEMPLATE, context! {}).unwrap();
        assert!(page.contains("name=\"full_name\""));
        assert!(page.contains("name=\"email\""));
        assert!(page.contains("name=\"cpf\""));
        assert!(page.contains("action=\"/submit\""));
    }

    #[test]
    fn test_values_are_escaped() {
        let renderer = TemplateRenderer::new().unwrap();
        let Html(page) = renderer
            .render(
                SUCCESS_TEMPLATE,
                context! { message => "<script>alert(1)</script>", stored => true },
            )
            .unwrap();
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let renderer = TemplateRenderer::new().unwrap();
        assert!(renderer.render("missing.html", context! {}).is_err());
    }
}
