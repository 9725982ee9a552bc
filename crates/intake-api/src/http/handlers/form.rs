//! Form HTTP handlers.
//!
//! Endpoints:
//! - GET    /forms        - List all stored forms
//! - GET    /form/{uuid}  - Get a single form
//! - POST   /form         - Create or overwrite a form
//! - DELETE /form/{uuid}  - Delete a form

use axum::extract::{Path, State};
use axum::Json;

use intake_core::gateway::SessionStore;
use intake_types::form::{
    DeleteFormResponse, FormListItem, FormPayload, SaveFormRequest, SaveFormResponse,
};
use intake_types::session::SessionId;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /forms
pub async fn list_forms(State(state): State<AppState>) -> Result<Json<Vec<FormListItem>>, AppError> {
    let records = state.store.list().await?;
    Ok(Json(records.into_iter().map(FormListItem::from).collect()))
}

/// GET /form/{uuid}
pub async fn get_form(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<FormPayload>, AppError> {
    let record = state.store.fetch(&SessionId::new(uuid)).await?;
    Ok(Json(FormPayload::from(record)))
}

/// POST /form
///
/// Without `uuid` a new form is created. With a `uuid` the stored answers are
/// replaced in full; an unknown `uuid` is created under that id.
pub async fn save_form(
    State(state): State<AppState>,
    Json(request): Json<SaveFormRequest>,
) -> Result<Json<SaveFormResponse>, AppError> {
    if let Some(uuid) = &request.uuid {
        if uuid.as_str().trim().is_empty() {
            return Err(AppError::Validation("uuid must not be blank".to_string()));
        }
    }

    let uuid = state
        .store
        .create_or_update(request.uuid.as_ref(), &request.data)
        .await?;
    tracing::debug!(%uuid, answers = request.data.len(), "form saved");

    Ok(Json(SaveFormResponse { uuid }))
}

/// DELETE /form/{uuid}
pub async fn delete_form(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<DeleteFormResponse>, AppError> {
    state.store.delete(&SessionId::new(uuid)).await?;
    Ok(Json(DeleteFormResponse {
        message: "Form deleted successfully".to_string(),
    }))
}
