use axum::{
    body::Bytes,
    extract::{RawForm, State},
    response::{Html, IntoResponse, Redirect},
};
use minijinja::context;
use tracing::{error, info, instrument, warn};
use url::form_urlencoded;

use petri_dish_domain::entities::{BloodPressureForm, PatientForm};
use petri_dish_domain::services::{Persistence, SubmissionOutcome};

use crate::api::routes::AppState;
use crate::render::{
    RenderError, DASHBOARD_TEMPLATE, DATA_TEMPLATE, FORM_TEMPLATE, SUCCESS_TEMPLATE,
};

/// Confirmation shown after every patient submission
pub const SUCCESS_MESSAGE: &str = "Cadastro feito com sucesso!";

/// Show the patient registration form
#[instrument(skip(state))]
pub async fn show_form(State(state): State<AppState>) -> Result<Html<String>, RenderError> {
    state.renderer.render(FORM_TEMPLATE, context! {})
}

/// Store a patient registration and confirm it.
///
/// The confirmation is shown even when the write fails; the outcome only
/// changes the notices on the page.
#[instrument(skip(state, form))]
pub async fn submit_form(
    State(state): State<AppState>,
    form: Option<RawForm>,
) -> Result<Html<String>, RenderError> {
    let body = form_body(form, "/submit");
    let form = PatientForm::from_pairs(form_urlencoded::parse(&body));
    let outcome = state.records.register_patient(form).await;
    log_outcome(&outcome);

    state.renderer.render(
        SUCCESS_TEMPLATE,
        context! {
            message => SUCCESS_MESSAGE,
            stored => outcome.is_stored(),
            missing_fields => outcome.missing_fields,
        },
    )
}

/// List every stored document with its raw fields
#[instrument(skip(state))]
pub async fn display_data(State(state): State<AppState>) -> Result<Html<String>, RenderError> {
    let listed = state.records.list_documents().await;
    if let Some(reason) = &listed.failure {
        error!("Failed to read documents: {}", reason);
    }
    info!("Listing {} documents", listed.items.len());

    state.renderer.render(
        DATA_TEMPLATE,
        context! {
            data => listed.items,
            load_error => listed.failure.is_some(),
        },
    )
}

/// Show the blood pressure dashboard
#[instrument(skip(state))]
pub async fn user_dashboard(State(state): State<AppState>) -> Result<Html<String>, RenderError> {
    let rows = state.records.dashboard_rows().await;
    if let Some(reason) = &rows.failure {
        error!("Failed to read blood pressure data: {}", reason);
    }

    state.renderer.render(
        DASHBOARD_TEMPLATE,
        context! {
            blood_pressure_data => rows.items,
            load_error => rows.failure.is_some(),
        },
    )
}

/// Store a blood pressure reading and go back to the dashboard, whatever the outcome
#[instrument(skip(state, form))]
pub async fn submit_blood_pressure(
    State(state): State<AppState>,
    form: Option<RawForm>,
) -> impl IntoResponse {
    let body = form_body(form, "/dashboard/submit");
    let form = BloodPressureForm::from_pairs(form_urlencoded::parse(&body));
    let outcome = state.records.record_blood_pressure(form).await;
    log_outcome(&outcome);

    Redirect::to("/dashboard")
}

// A body that is not URL-encoded reads as a form with every field missing
fn form_body(form: Option<RawForm>, path: &str) -> Bytes {
    match form {
        Some(RawForm(body)) => body,
        None => {
            warn!("Unreadable form body on {}, treating every field as missing", path);
            Bytes::new()
        }
    }
}

fn log_outcome(outcome: &SubmissionOutcome) {
    match &outcome.persistence {
        Persistence::Stored { id } => info!("Stored {:?} record {}", outcome.kind, id),
        Persistence::Failed { reason } => {
            error!("Failed to store {:?} record: {}", outcome.kind, reason)
        }
    }
    if !outcome.is_complete() {
        warn!("Missing form fields stored as empty: {}", outcome.missing_fields.join(", "));
    }
}
