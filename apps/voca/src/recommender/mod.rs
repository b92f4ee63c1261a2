//! Recommendation client: the single point of contact with the external
//! career recommendation service (`GET /`, `POST /recommend-careers`).
//!
//! RULE: no other module talks to the service directly. One attempt per call;
//! callers that want retries layer them on top.
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::RoleCatalog;
use crate::models::profile::UserInput;
use crate::models::recommendation::Recommendation;
use crate::profile::validation::ValidationErrors;

pub mod handlers;
pub mod schema;
pub mod skill_gap;

use schema::validate_recommendations;

const RECOMMEND_PATH: &str = "/recommend-careers";
const HEALTH_PATH: &str = "/";

#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error("could not reach the recommendation service: {0}")]
    Connectivity(#[source] reqwest::Error),

    #[error("recommendation service returned {status}: {reason}")]
    Protocol { status: u16, reason: String },

    #[error("recommendation service returned a malformed response: {0}")]
    Schema(String),

    #[error("profile rejected before submission: {0}")]
    InvalidInput(#[from] ValidationErrors),
}

/// Machine-readable failure class for logs and API error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Connectivity,
    Protocol,
    Schema,
    Validation,
}

impl RecommenderError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RecommenderError::Connectivity(_) => FailureKind::Connectivity,
            RecommenderError::Protocol { .. } => FailureKind::Protocol,
            RecommenderError::Schema(_) => FailureKind::Schema,
            RecommenderError::InvalidInput(_) => FailureKind::Validation,
        }
    }

    /// The sentence shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            RecommenderError::Connectivity(_) => {
                "Could not reach the recommendation service. Please try again.".to_string()
            }
            RecommenderError::Protocol { status, reason } => {
                format!("The recommendation service responded with {status} {reason}.")
            }
            RecommenderError::Schema(_) => {
                "The recommendation service returned an unexpected response.".to_string()
            }
            RecommenderError::InvalidInput(_) => {
                "Please correct the highlighted fields.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct RecommendResponse {
    recommendations: Vec<Recommendation>,
}

/// FastAPI error bodies carry `detail` as either a string or a list.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    detail: serde_json::Value,
}

/// The recommender seam. Handlers hold an `Arc<dyn Recommender>` so tests can
/// swap in stubs without a network.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Where requests go, as actually used.
    fn base_url(&self) -> &str;

    async fn health(&self) -> Result<HealthStatus, RecommenderError>;

    /// Returns recommendations in the order the service sent them.
    async fn recommend(&self, input: &UserInput)
        -> Result<Vec<Recommendation>, RecommenderError>;
}

/// HTTP implementation of [`Recommender`].
#[derive(Clone)]
pub struct RecommendationClient {
    client: Client,
    base_url: String,
    catalog: Arc<RoleCatalog>,
}

impl RecommendationClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        catalog: Arc<RoleCatalog>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            catalog,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Recommender for RecommendationClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn health(&self) -> Result<HealthStatus, RecommenderError> {
        let url = self.url(HEALTH_PATH);
        debug!("Probing recommendation service at {url}");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(RecommenderError::Connectivity)?;

        let body = read_success_body(response).await?;
        let status: HealthStatus = serde_json::from_str(&body)
            .map_err(|e| RecommenderError::Schema(format!("health body: {e}")))?;

        info!("Recommendation service is up: {}", status.message);
        Ok(status)
    }

    async fn recommend(
        &self,
        input: &UserInput,
    ) -> Result<Vec<Recommendation>, RecommenderError> {
        input.validate()?;

        let url = self.url(RECOMMEND_PATH);
        debug!(
            "Requesting recommendations from {url} (interests={}, skills={})",
            input.interests.len(),
            input.skills.len()
        );

        let response = self
            .client
            .post(&url)
            .json(input)
            .send()
            .await
            .map_err(RecommenderError::Connectivity)?;

        let body = read_success_body(response).await?;
        let parsed: RecommendResponse = serde_json::from_str(&body)
            .map_err(|e| RecommenderError::Schema(e.to_string()))?;

        validate_recommendations(&parsed.recommendations, &self.catalog)
            .map_err(|e| RecommenderError::Schema(e.to_string()))?;

        info!(
            "Received {} recommendation(s)",
            parsed.recommendations.len()
        );
        Ok(parsed.recommendations)
    }
}

/// Returns the body of a 2xx response, or a `Protocol` error carrying the status
/// and the best reason available.
async fn read_success_body(response: reqwest::Response) -> Result<String, RecommenderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(RecommenderError::Connectivity)?;

    if status.is_success() {
        return Ok(body);
    }

    warn!("Recommendation service returned {status}: {body}");
    let reason = serde_json::from_str::<ServiceErrorBody>(&body)
        .map(|e| match e.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Unknown").to_string());

    Err(RecommenderError::Protocol {
        status: status.as_u16(),
        reason,
    })
}
