//! Axum route handlers for saved careers and the roadmap.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::recommendation::Recommendation;
use crate::recommender::schema::validate_recommendations;
use crate::state::AppState;
use crate::tracker::{Roadmap, SavedCareer, SortBy};

#[derive(Debug, Default, Deserialize)]
pub struct SavedQuery {
    #[serde(default)]
    pub sort: SortBy,
}

#[derive(Debug, Serialize)]
pub struct SavedListResponse {
    pub saved: Vec<SavedCareer>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoadmapRequest {
    pub role_id: String,
}

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    #[serde(flatten)]
    pub roadmap: Roadmap,
    pub progress: u8,
}

impl From<Roadmap> for RoadmapResponse {
    fn from(roadmap: Roadmap) -> Self {
        let progress = roadmap.progress();
        Self { roadmap, progress }
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub task_id: String,
    pub completed: bool,
    pub progress: u8,
}

/// GET /api/v1/saved?sort=recent|match
pub async fn handle_list_saved(
    State(state): State<AppState>,
    Query(query): Query<SavedQuery>,
) -> Json<SavedListResponse> {
    let saved = state.saved.read().await.list(query.sort);
    Json(SavedListResponse {
        total: saved.len(),
        saved,
    })
}

/// POST /api/v1/saved
///
/// Saved snapshots must be well-formed recommendations, same as results from
/// the service.
pub async fn handle_save_career(
    State(state): State<AppState>,
    Json(recommendation): Json<Recommendation>,
) -> Result<(StatusCode, Json<SavedCareer>), AppError> {
    validate_recommendations(std::slice::from_ref(&recommendation), &state.catalog)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let role_id = recommendation.role_id.clone();
    let saved = state.saved.write().await.save(recommendation).clone();
    info!(role_id = %role_id, "Career saved");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /api/v1/saved/:role_id
pub async fn handle_remove_saved(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .saved
        .write()
        .await
        .remove(&role_id)
        .ok_or_else(|| AppError::NotFound(format!("Career '{role_id}' is not saved")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/roadmap
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
) -> Result<Json<RoadmapResponse>, AppError> {
    let roadmap = state
        .roadmap
        .read()
        .await
        .clone()
        .ok_or_else(|| AppError::NotFound("No roadmap yet".to_string()))?;
    Ok(Json(roadmap.into()))
}

/// POST /api/v1/roadmap
///
/// Replaces the current roadmap with one derived from a saved career.
pub async fn handle_create_roadmap(
    State(state): State<AppState>,
    Json(req): Json<CreateRoadmapRequest>,
) -> Result<(StatusCode, Json<RoadmapResponse>), AppError> {
    let roadmap = {
        let saved = state.saved.read().await;
        let career = saved.get(&req.role_id).ok_or_else(|| {
            AppError::NotFound(format!("Career '{}' is not saved", req.role_id))
        })?;
        Roadmap::from_recommendation(&career.recommendation)
    };

    info!(
        role_id = %roadmap.role_id,
        tasks = roadmap.tasks().count(),
        "Roadmap created"
    );
    *state.roadmap.write().await = Some(roadmap.clone());
    Ok((StatusCode::CREATED, Json(roadmap.into())))
}

/// POST /api/v1/roadmap/tasks/:task_id/toggle
pub async fn handle_toggle_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<ToggleResponse>, AppError> {
    let mut guard = state.roadmap.write().await;
    let roadmap = guard
        .as_mut()
        .ok_or_else(|| AppError::NotFound("No roadmap yet".to_string()))?;
    let completed = roadmap
        .toggle_task(&task_id)
        .ok_or_else(|| AppError::NotFound(format!("Task '{task_id}' not found")))?;

    Ok(Json(ToggleResponse {
        progress: roadmap.progress(),
        task_id,
        completed,
    }))
}
