pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::onboarding::handlers as onboarding;
use crate::profile::handlers as wizard;
use crate::recommender::handlers as recommender;
use crate::state::AppState;
use crate::tracker::handlers as tracker;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Recommendation service
        .route(
            "/api/v1/recommender/health",
            get(recommender::handle_recommender_health),
        )
        .route(
            "/api/v1/recommendations",
            post(recommender::handle_recommend),
        )
        .route("/api/v1/catalog/roles", get(recommender::handle_list_roles))
        .route(
            "/api/v1/catalog/options",
            get(recommender::handle_intake_options),
        )
        .route(
            "/api/v1/skill-gap/preview",
            post(recommender::handle_preview_skill_gap),
        )
        // Intake wizard
        .route("/api/v1/wizard", post(wizard::handle_create_wizard))
        .route(
            "/api/v1/wizard/:id",
            get(wizard::handle_get_wizard).delete(wizard::handle_delete_wizard),
        )
        .route("/api/v1/wizard/:id/draft", patch(wizard::handle_edit_draft))
        .route("/api/v1/wizard/:id/next", post(wizard::handle_next))
        .route("/api/v1/wizard/:id/previous", post(wizard::handle_previous))
        .route("/api/v1/wizard/:id/submit", post(wizard::handle_submit))
        // Onboarding tour
        .route(
            "/api/v1/onboarding",
            get(onboarding::handle_get_onboarding)
                .post(onboarding::handle_mark_onboarding_seen)
                .delete(onboarding::handle_reset_onboarding),
        )
        // Chat
        .route(
            "/api/v1/chat",
            get(chat::handle_chat_intro).post(chat::handle_chat),
        )
        // Saved careers and roadmap
        .route(
            "/api/v1/saved",
            get(tracker::handle_list_saved).post(tracker::handle_save_career),
        )
        .route(
            "/api/v1/saved/:role_id",
            delete(tracker::handle_remove_saved),
        )
        .route(
            "/api/v1/roadmap",
            get(tracker::handle_get_roadmap).post(tracker::handle_create_roadmap),
        )
        .route(
            "/api/v1/roadmap/tasks/:task_id/toggle",
            post(tracker::handle_toggle_task),
        )
        .with_state(state)
}
