use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Liveness of this service only; the recommendation service is probed separately.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "voca"
    }))
}
