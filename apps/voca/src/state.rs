use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::RoleCatalog;
use crate::chat::ChatResponder;
use crate::config::Config;
use crate::onboarding::OnboardingStore;
use crate::profile::wizard::WizardSessions;
use crate::recommender::Recommender;
use crate::tracker::{Roadmap, SavedCareers};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable recommendation backend. Default: `RecommendationClient` over HTTP.
    pub recommender: Arc<dyn Recommender>,
    pub catalog: Arc<RoleCatalog>,
    pub wizards: WizardSessions,
    pub onboarding: Arc<dyn OnboardingStore>,
    pub chat: Arc<ChatResponder>,
    pub saved: Arc<RwLock<SavedCareers>>,
    /// At most one active roadmap.
    pub roadmap: Arc<RwLock<Option<Roadmap>>>,
}

impl AppState {
    pub fn new(
        config: Config,
        recommender: Arc<dyn Recommender>,
        catalog: Arc<RoleCatalog>,
        onboarding: Arc<dyn OnboardingStore>,
    ) -> Self {
        Self {
            config,
            recommender,
            catalog,
            wizards: WizardSessions::default(),
            onboarding,
            chat: Arc::new(ChatResponder::default()),
            saved: Arc::new(RwLock::new(SavedCareers::new())),
            roadmap: Arc::new(RwLock::new(None)),
        }
    }
}
