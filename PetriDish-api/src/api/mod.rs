pub mod handlers;
pub mod routes;

use std::sync::Arc;
use axum::Router;

use petri_dish_data::repository::RecordRepositoryTrait;
use petri_dish_domain::services::create_record_service;

use crate::render::RenderError;

/// Create the application router over an already connected repository
pub fn create_application(
    repository: Arc<dyn RecordRepositoryTrait>,
) -> Result<Router, RenderError> {
    let state = routes::AppState::new(create_record_service(repository))?;
    Ok(routes::create_app(state))
}
