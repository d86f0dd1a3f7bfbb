use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

use petri_dish_domain::services::RecordServiceTrait;

use crate::api::handlers::{health, pages};
use crate::render::{RenderError, TemplateRenderer};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordServiceTrait>,
    pub renderer: Arc<TemplateRenderer>,
}

impl AppState {
    /// Build the state around a record service, loading the page templates
    pub fn new(records: Arc<dyn RecordServiceTrait>) -> Result<Self, RenderError> {
        Ok(Self {
            records,
            renderer: Arc::new(TemplateRenderer::new()?),
        })
    }
}

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    let page_routes = Router::new()
        .route("/", get(pages::show_form))
        .route("/submit", post(pages::submit_form))
        .route("/data", get(pages::display_data))
        .route("/dashboard", get(pages::user_dashboard))
        .route("/dashboard/submit", post(pages::submit_blood_pressure));

    debug!("Page routes configured");

    Router::new()
        .merge(page_routes)
        .route("/health", get(health::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
