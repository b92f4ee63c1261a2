use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourOutcome {
    Skipped,
    Completed,
}

#[derive(Debug, Deserialize)]
pub struct MarkSeenRequest {
    pub outcome: TourOutcome,
}

#[derive(Debug, Serialize)]
pub struct OnboardingStatus {
    pub seen: bool,
}

/// GET /api/v1/onboarding
pub async fn handle_get_onboarding(
    State(state): State<AppState>,
) -> Result<Json<OnboardingStatus>, AppError> {
    let seen = state.onboarding.has_seen().await?;
    Ok(Json(OnboardingStatus { seen }))
}

/// POST /api/v1/onboarding
pub async fn handle_mark_onboarding_seen(
    State(state): State<AppState>,
    Json(req): Json<MarkSeenRequest>,
) -> Result<Json<OnboardingStatus>, AppError> {
    state.onboarding.mark_seen().await?;
    info!(outcome = ?req.outcome, "Guided tour dismissed");
    Ok(Json(OnboardingStatus { seen: true }))
}

/// DELETE /api/v1/onboarding ("restart tour")
pub async fn handle_reset_onboarding(
    State(state): State<AppState>,
) -> Result<Json<OnboardingStatus>, AppError> {
    state.onboarding.reset().await?;
    info!("Guided tour reset");
    Ok(Json(OnboardingStatus { seen: false }))
}
