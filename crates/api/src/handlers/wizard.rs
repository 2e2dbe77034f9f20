//! # Wizard Handlers
//!
//! Each dashboard booking wizard is a server-side session. The front end
//! posts intents and navigation actions; every response carries the full
//! `WizardView` snapshot so the client never derives workflow state itself.

use axum::{
    extract::{Path, State},
    Json,
};
use brightbook_core::{
    models::reference::DeletedResponse,
    wizard::{CancelOutcome, StepController, SubmitOutcome, WizardIntent, WizardView},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    middleware::error_handling::AppError,
    sessions::{abandon, lock_session, release_if_expired},
    ApiState,
};

/// Snapshot of a session plus the outcome of the action that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub view: WizardView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel: Option<CancelOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<SubmitOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_booking_id: Option<Uuid>,
}

impl WizardResponse {
    fn of(session_id: Uuid, wizard: &StepController) -> Self {
        Self {
            session_id,
            view: wizard.view(Utc::now()),
            cancel: None,
            submission: None,
            confirmed_booking_id: None,
        }
    }
}

#[axum::debug_handler]
pub async fn create_session(State(state): State<Arc<ApiState>>) -> Result<Json<WizardResponse>, AppError> {
    let (session_id, wizard) = state.sessions.create(state.hold_seconds).await;
    let wizard = lock_session(&wizard)?;
    info!(%session_id, "booking wizard opened");
    Ok(Json(WizardResponse::of(session_id, &wizard)))
}

#[axum::debug_handler]
pub async fn get_session(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = lock_session(&session)?;
    release_if_expired(&mut wizard, state.backend.as_ref(), Utc::now()).await;
    Ok(Json(WizardResponse::of(id, &wizard)))
}

#[axum::debug_handler]
pub async fn apply_intent(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(intent): Json<WizardIntent>,
) -> Result<Json<WizardResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = lock_session(&session)?;
    wizard.apply(intent, state.backend.as_ref()).await?;
    Ok(Json(WizardResponse::of(id, &wizard)))
}

#[axum::debug_handler]
pub async fn advance(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = lock_session(&session)?;
    let step = wizard.advance(state.backend.as_ref()).await?;
    info!(session_id = %id, step = step.number(), "wizard advanced");
    Ok(Json(WizardResponse::of(id, &wizard)))
}

#[axum::debug_handler]
pub async fn retreat(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = lock_session(&session)?;
    wizard.retreat()?;
    Ok(Json(WizardResponse::of(id, &wizard)))
}

#[axum::debug_handler]
pub async fn cancel(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = lock_session(&session)?;
    let outcome = wizard.cancel()?;
    Ok(Json(WizardResponse {
        cancel: Some(outcome),
        ..WizardResponse::of(id, &wizard)
    }))
}

#[axum::debug_handler]
pub async fn dismiss_cancel(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = lock_session(&session)?;
    wizard.dismiss_cancel();
    Ok(Json(WizardResponse::of(id, &wizard)))
}

#[axum::debug_handler]
pub async fn confirm_cancel(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = lock_session(&session)?;
    wizard.confirm_cancel(state.backend.as_ref()).await?;
    info!(session_id = %id, "booking abandoned");
    Ok(Json(WizardResponse::of(id, &wizard)))
}

#[axum::debug_handler]
pub async fn submit(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = lock_session(&session)?;
    let outcome = wizard.submit(state.backend.as_ref(), Utc::now()).await?;
    Ok(Json(WizardResponse {
        submission: Some(outcome),
        ..WizardResponse::of(id, &wizard)
    }))
}

#[axum::debug_handler]
pub async fn confirm(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut wizard = lock_session(&session)?;
    let booking_id = wizard.confirm(state.backend.as_ref(), Utc::now()).await?;
    Ok(Json(WizardResponse {
        confirmed_booking_id: Some(booking_id),
        ..WizardResponse::of(id, &wizard)
    }))
}

/// Closes a session. A booking still blocked by it is released first.
#[axum::debug_handler]
pub async fn delete_session(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    {
        let mut wizard = lock_session(&session)?;
        abandon(&mut wizard, state.backend.as_ref()).await?;
    }
    state.sessions.remove(id).await;
    info!(session_id = %id, "booking wizard closed");
    Ok(Json(DeletedResponse { id, deleted: true }))
}
