//! Axum route handlers for the intake wizard.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use anyhow::anyhow;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::profile::draft::DraftEdit;
use crate::profile::wizard::{
    prune_expired, SubmissionFailure, Wizard, WizardError, WizardSnapshot,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DraftEditRequest {
    pub edits: Vec<DraftEdit>,
}

fn wizard_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Wizard {id} not found"))
}

/// Runs `f` against wizard `id` under the session lock and returns its result
/// together with the resulting snapshot.
async fn with_wizard<T>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut Wizard) -> Result<T, WizardError>,
) -> Result<(T, WizardSnapshot), AppError> {
    let mut sessions = state.wizards.write().await;
    let wizard = sessions.get_mut(&id).ok_or_else(|| wizard_not_found(id))?;
    let value = f(wizard)?;
    Ok((value, wizard.snapshot()))
}

/// POST /api/v1/wizard
///
/// Idle sessions are pruned before the new one is stored.
pub async fn handle_create_wizard(
    State(state): State<AppState>,
) -> (StatusCode, Json<WizardSnapshot>) {
    let wizard = Wizard::new();
    let snapshot = wizard.snapshot();
    {
        let mut sessions = state.wizards.write().await;
        let pruned = prune_expired(&mut sessions, state.config.wizard_ttl);
        if pruned > 0 {
            debug!(pruned, "Pruned idle wizards");
        }
        sessions.insert(wizard.id(), wizard);
    }
    info!(wizard = %snapshot.id, "Wizard started");
    (StatusCode::CREATED, Json(snapshot))
}

/// GET /api/v1/wizard/:id
pub async fn handle_get_wizard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let sessions = state.wizards.read().await;
    let wizard = sessions.get(&id).ok_or_else(|| wizard_not_found(id))?;
    Ok(Json(wizard.snapshot()))
}

/// DELETE /api/v1/wizard/:id
pub async fn handle_delete_wizard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .wizards
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| wizard_not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/wizard/:id/draft
pub async fn handle_edit_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DraftEditRequest>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let ((), snapshot) = with_wizard(&state, id, |w| w.apply_edits(req.edits)).await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/wizard/:id/next
pub async fn handle_next(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let (_, snapshot) = with_wizard(&state, id, Wizard::next).await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/wizard/:id/previous
pub async fn handle_previous(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let (_, snapshot) = with_wizard(&state, id, Wizard::previous).await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/wizard/:id/submit
///
/// The session lock is released while the recommendation request is in flight;
/// the wizard itself rejects a second submit until this one resolves. The
/// request runs on its own task so the outcome is applied even if the caller
/// goes away.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, AppError> {
    let (submission, _) = with_wizard(&state, id, Wizard::begin_submission).await?;
    info!(wizard = %id, ticket = submission.ticket, "Submitting profile for recommendations");

    let task = tokio::spawn(async move {
        let result = state.recommender.recommend(&submission.input).await;

        let (outcome, error) = match result {
            Ok(recommendations) => (Ok(recommendations), None),
            Err(e) => (Err(SubmissionFailure::from(&e)), Some(e)),
        };

        let finished = with_wizard(&state, id, |w| {
            w.finish_submission(submission.ticket, outcome)
        })
        .await;
        (finished, error)
    });

    let (finished, error) = task
        .await
        .map_err(|e| AppError::Internal(anyhow!("Submission task failed: {e}")))?;
    let ((), snapshot) = finished?;

    match error {
        Some(e) => Err(e.into()),
        None => Ok(Json(snapshot)),
    }
}
