//! Axum route handlers for single-form submission, the upstream health probe,
//! the role catalog and skill-gap previews.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use tracing::info;

use crate::catalog::RoleProfile;
use crate::errors::AppError;
use crate::models::profile::{
    SkillLevel, UserType, EDUCATION_LEVELS, EDUCATION_STREAMS, KNOWN_SKILLS,
};
use crate::models::recommendation::SkillGap;
use crate::profile::draft::ProfileDraft;
use crate::profile::validation::{check_skill_levels, whole_number, ValidationErrors};
use crate::recommender::skill_gap::{group_for_display, preview, GapGroup, ResultsView};
use crate::recommender::HealthStatus;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UpstreamHealthResponse {
    pub status: &'static str,
    pub base_url: String,
    pub upstream: HealthStatus,
}

#[derive(Debug, Deserialize)]
pub struct SkillGapPreviewRequest {
    pub role_id: String,
    #[serde(default)]
    pub skills: BTreeMap<String, Number>,
}

#[derive(Debug, Serialize)]
pub struct SkillGapPreviewResponse {
    pub role_id: String,
    pub name: String,
    pub skill_gap: SkillGap,
    pub skill_groups: Vec<GapGroup>,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub roles: Vec<RoleProfile>,
}

/// Candidate values for the intake form's pickers.
#[derive(Debug, Serialize)]
pub struct IntakeOptionsResponse {
    pub user_types: [UserType; 3],
    pub education_levels: &'static [&'static str],
    pub education_streams: &'static [&'static str],
    pub skills: &'static [&'static str],
    pub min_level: u8,
    pub max_level: u8,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/recommender/health
pub async fn handle_recommender_health(
    State(state): State<AppState>,
) -> Result<Json<UpstreamHealthResponse>, AppError> {
    let upstream = state.recommender.health().await?;
    Ok(Json(UpstreamHealthResponse {
        status: "ok",
        base_url: state.recommender.base_url().to_string(),
        upstream,
    }))
}

/// POST /api/v1/recommendations
///
/// Single-form path: the whole draft arrives at once and is validated before
/// anything is sent upstream.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(draft): Json<ProfileDraft>,
) -> Result<Json<ResultsView>, AppError> {
    let input = draft.build()?;
    let recommendations = state.recommender.recommend(&input).await?;
    info!(
        "Single-form submission returned {} recommendation(s)",
        recommendations.len()
    );
    Ok(Json(ResultsView::new(&recommendations)))
}

/// GET /api/v1/catalog/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        roles: state.catalog.roles().to_vec(),
    })
}

/// GET /api/v1/catalog/options
pub async fn handle_intake_options() -> Json<IntakeOptionsResponse> {
    Json(IntakeOptionsResponse {
        user_types: UserType::ALL,
        education_levels: EDUCATION_LEVELS,
        education_streams: EDUCATION_STREAMS,
        skills: KNOWN_SKILLS,
        min_level: SkillLevel::MIN.get(),
        max_level: SkillLevel::MAX.get(),
    })
}

/// POST /api/v1/skill-gap/preview
pub async fn handle_preview_skill_gap(
    State(state): State<AppState>,
    Json(req): Json<SkillGapPreviewRequest>,
) -> Result<Json<SkillGapPreviewResponse>, AppError> {
    ValidationErrors::check(check_skill_levels(&req.skills))?;

    let role = state
        .catalog
        .get(&req.role_id)
        .ok_or_else(|| AppError::NotFound(format!("Role '{}' not found", req.role_id)))?;

    let skills: BTreeMap<String, SkillLevel> = req
        .skills
        .into_iter()
        .filter_map(|(skill, raw)| {
            whole_number(&raw)
                .and_then(SkillLevel::new)
                .map(|level| (skill, level))
        })
        .collect();
    let skill_gap = preview(&skills, &role.required_skills);

    Ok(Json(SkillGapPreviewResponse {
        role_id: role.id.clone(),
        name: role.name.clone(),
        skill_groups: group_for_display(&skill_gap),
        skill_gap,
    }))
}
