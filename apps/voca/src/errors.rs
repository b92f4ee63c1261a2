use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::profile::validation::ValidationErrors;
use crate::profile::wizard::WizardError;
use crate::recommender::RecommenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Validation(ValidationErrors),

    #[error("Conflict: {message}")]
    Conflict { code: &'static str, message: String },

    #[error(transparent)]
    Recommender(RecommenderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<RecommenderError> for AppError {
    fn from(err: RecommenderError) -> Self {
        match err {
            RecommenderError::InvalidInput(errors) => AppError::Validation(errors),
            other => AppError::Recommender(other),
        }
    }
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::Incomplete(errors) => AppError::Validation(errors),
            WizardError::SubmissionInFlight => AppError::Conflict {
                code: "SUBMISSION_IN_FLIGHT",
                message: err.to_string(),
            },
            WizardError::AtFirstStep
            | WizardError::AtLastStep
            | WizardError::NotAtSkillsStep
            | WizardError::Completed => AppError::Conflict {
                code: "INVALID_TRANSITION",
                message: err.to_string(),
            },
            WizardError::Superseded => AppError::Conflict {
                code: "SUBMISSION_SUPERSEDED",
                message: err.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Validation(errors) => {
                let body = Json(json!({
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "message": "Please correct the highlighted fields.",
                        "fields": errors.fields,
                    }
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Conflict { code, message } => (StatusCode::CONFLICT, *code, message.clone()),
            AppError::Recommender(e) => {
                let kind = e.kind();
                tracing::error!(?kind, "Recommender error: {e}");
                let (status, code) = match e {
                    RecommenderError::Connectivity(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "RECOMMENDER_UNREACHABLE")
                    }
                    RecommenderError::Protocol { .. } => {
                        (StatusCode::BAD_GATEWAY, "RECOMMENDER_PROTOCOL_ERROR")
                    }
                    RecommenderError::Schema(_) => {
                        (StatusCode::BAD_GATEWAY, "RECOMMENDER_SCHEMA_ERROR")
                    }
                    RecommenderError::InvalidInput(_) => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                };
                let body = Json(json!({
                    "error": {
                        "code": code,
                        "kind": kind,
                        "message": e.user_message(),
                    }
                }));
                return (status, body).into_response();
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
