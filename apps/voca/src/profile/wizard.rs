//! Three-step intake wizard: profile → interests/industries → skills → results.
//!
//! Modelled as an explicit state value. Forward moves are gated by the current
//! step's requirements; submission hands out a ticket, and only the result for the
//! current ticket is applied (last submission wins).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::profile::UserInput;
use crate::models::recommendation::Recommendation;
use crate::profile::draft::{DraftEdit, ProfileDraft};
use crate::profile::validation::{
    check_interests_step, check_profile_step, FieldError, ValidationErrors,
};
use crate::recommender::skill_gap::ResultsView;
use crate::recommender::{FailureKind, RecommenderError};

/// Live wizards keyed by session id.
pub type WizardSessions = Arc<RwLock<HashMap<Uuid, Wizard>>>;

/// Drops wizards idle for longer than `ttl`. Returns how many were removed.
pub fn prune_expired(sessions: &mut HashMap<Uuid, Wizard>, ttl: Duration) -> usize {
    let now = Utc::now();
    let before = sessions.len();
    sessions.retain(|_, wizard| !wizard.is_expired(now, ttl));
    before - sessions.len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Profile,
    Interests,
    Skills,
}

impl WizardStep {
    pub fn index(self) -> u8 {
        match self {
            WizardStep::Profile => 1,
            WizardStep::Interests => 2,
            WizardStep::Skills => 3,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            WizardStep::Profile => Some(WizardStep::Interests),
            WizardStep::Interests => Some(WizardStep::Skills),
            WizardStep::Skills => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            WizardStep::Profile => None,
            WizardStep::Interests => Some(WizardStep::Profile),
            WizardStep::Skills => Some(WizardStep::Interests),
        }
    }

    /// Unmet requirements for leaving this step. Skills has none.
    pub fn requirements(self, draft: &ProfileDraft) -> Vec<FieldError> {
        match self {
            WizardStep::Profile => check_profile_step(draft),
            WizardStep::Interests => check_interests_step(draft),
            WizardStep::Skills => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardState {
    Editing { step: WizardStep },
    Submitting { ticket: u64 },
    Completed { recommendations: Vec<Recommendation> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    Editing,
    Submitting,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("the current step is incomplete")]
    Incomplete(ValidationErrors),

    #[error("already at the first step")]
    AtFirstStep,

    #[error("skills is the last step; submit instead")]
    AtLastStep,

    #[error("submission is only possible from the skills step")]
    NotAtSkillsStep,

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("the wizard is completed; step back to edit the profile")]
    Completed,

    #[error("the submission was superseded by a newer one")]
    Superseded,
}

/// Why the last submission failed, kept for display after the wizard returns
/// to the skills step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&RecommenderError> for SubmissionFailure {
    fn from(err: &RecommenderError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}

/// A submission handed to the caller: send `input`, then report back with `ticket`.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub ticket: u64,
    pub input: UserInput,
}

#[derive(Debug, Clone)]
pub struct Wizard {
    id: Uuid,
    draft: ProfileDraft,
    state: WizardState,
    next_ticket: u64,
    last_failure: Option<SubmissionFailure>,
    updated_at: DateTime<Utc>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            draft: ProfileDraft::default(),
            state: WizardState::Editing {
                step: WizardStep::Profile,
            },
            next_ticket: 1,
            last_failure: None,
            updated_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Edits are accepted on any step while editing.
    pub fn apply_edits(&mut self, edits: Vec<DraftEdit>) -> Result<(), WizardError> {
        self.ensure_editing()?;
        for edit in edits {
            self.draft.apply(edit);
        }
        self.touch();
        Ok(())
    }

    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.ensure_editing()?;
        ValidationErrors::check(step.requirements(&self.draft)).map_err(WizardError::Incomplete)?;
        let next = step.next().ok_or(WizardError::AtLastStep)?;
        self.state = WizardState::Editing { step: next };
        self.touch();
        Ok(next)
    }

    /// Steps back. From `Submitting` this abandons the in-flight submission;
    /// from `Completed` it reopens the skills step.
    pub fn previous(&mut self) -> Result<WizardStep, WizardError> {
        let target = match self.state {
            WizardState::Editing { step } => step.previous().ok_or(WizardError::AtFirstStep)?,
            WizardState::Submitting { ticket } => {
                tracing::info!(wizard = %self.id, ticket, "Abandoning in-flight submission");
                WizardStep::Skills
            }
            WizardState::Completed { .. } => WizardStep::Skills,
        };
        self.state = WizardState::Editing { step: target };
        self.touch();
        Ok(target)
    }

    /// Moves to `Submitting` and returns the profile to send.
    /// Every gate is re-checked because edits are allowed on any step.
    pub fn begin_submission(&mut self) -> Result<Submission, WizardError> {
        match self.state {
            WizardState::Editing {
                step: WizardStep::Skills,
            } => {}
            WizardState::Editing { .. } => return Err(WizardError::NotAtSkillsStep),
            WizardState::Submitting { .. } => return Err(WizardError::SubmissionInFlight),
            WizardState::Completed { .. } => return Err(WizardError::Completed),
        }

        let mut errors = check_profile_step(&self.draft);
        errors.extend(check_interests_step(&self.draft));
        ValidationErrors::check(errors).map_err(WizardError::Incomplete)?;
        let input = self.draft.build().map_err(WizardError::Incomplete)?;

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.state = WizardState::Submitting { ticket };
        self.last_failure = None;
        self.touch();

        Ok(Submission { ticket, input })
    }

    /// Applies the outcome of submission `ticket`. Outcomes for any other ticket
    /// are discarded with `Superseded`; the state is left untouched.
    pub fn finish_submission(
        &mut self,
        ticket: u64,
        outcome: Result<Vec<Recommendation>, SubmissionFailure>,
    ) -> Result<(), WizardError> {
        if self.state != (WizardState::Submitting { ticket }) {
            tracing::debug!(wizard = %self.id, ticket, "Discarding stale submission result");
            return Err(WizardError::Superseded);
        }

        self.state = match outcome {
            Ok(recommendations) => WizardState::Completed { recommendations },
            Err(failure) => {
                self.last_failure = Some(failure);
                WizardState::Editing {
                    step: WizardStep::Skills,
                }
            }
        };
        self.touch();
        Ok(())
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        let (phase, step, step_index, results) = match &self.state {
            WizardState::Editing { step } => {
                (WizardPhase::Editing, Some(*step), step.index(), None)
            }
            WizardState::Submitting { .. } => (
                WizardPhase::Submitting,
                None,
                WizardStep::Skills.index(),
                None,
            ),
            WizardState::Completed { recommendations } => (
                WizardPhase::Completed,
                None,
                WizardStep::Skills.index() + 1,
                Some(ResultsView::new(recommendations)),
            ),
        };
        let blocking = step
            .map(|s| s.requirements(&self.draft))
            .unwrap_or_default();

        WizardSnapshot {
            id: self.id,
            phase,
            step,
            step_index,
            can_advance: step.is_some() && blocking.is_empty(),
            blocking,
            draft: self.draft.clone(),
            last_failure: self.last_failure.clone(),
            results,
            updated_at: self.updated_at,
        }
    }

    /// Idle for longer than `ttl` at `now`. A wizard with a submission in
    /// flight never expires.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        if matches!(self.state, WizardState::Submitting { .. }) {
            return false;
        }
        (now - self.updated_at)
            .to_std()
            .is_ok_and(|idle| idle > ttl)
    }

    fn ensure_editing(&self) -> Result<WizardStep, WizardError> {
        match self.state {
            WizardState::Editing { step } => Ok(step),
            WizardState::Submitting { .. } => Err(WizardError::SubmissionInFlight),
            WizardState::Completed { .. } => Err(WizardError::Completed),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// What the UI renders for a wizard.
#[derive(Debug, Clone, Serialize)]
pub struct WizardSnapshot {
    pub id: Uuid,
    pub phase: WizardPhase,
    pub step: Option<WizardStep>,
    /// 1–3 for the input steps, 4 for results.
    pub step_index: u8,
    pub can_advance: bool,
    pub blocking: Vec<FieldError>,
    pub draft: ProfileDraft,
    pub last_failure: Option<SubmissionFailure>,
    pub results: Option<ResultsView>,
    pub updated_at: DateTime<Utc>,
}
