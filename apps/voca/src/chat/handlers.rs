use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::chat::{ChatError, ChatReply, GREETING};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatIntro {
    pub greeting: &'static str,
    pub quick_actions: Vec<String>,
}

/// GET /api/v1/chat
pub async fn handle_chat_intro(State(state): State<AppState>) -> Json<ChatIntro> {
    Json(ChatIntro {
        greeting: GREETING,
        quick_actions: state.chat.quick_actions().to_vec(),
    })
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let reply = state.chat.respond(&req.message).map_err(|e| match e {
        ChatError::BlankMessage => AppError::BadRequest(e.to_string()),
    })?;
    Ok(Json(reply))
}
