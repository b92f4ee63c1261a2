use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::recommendation::Recommendation;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedCareer {
    pub recommendation: Recommendation,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Recent,
    Match,
}

/// Careers kept by the user, at most one per role.
/// Stored oldest first; re-saving moves an entry to the end.
#[derive(Debug, Default)]
pub struct SavedCareers {
    entries: Vec<SavedCareer>,
}

impl SavedCareers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self, recommendation: Recommendation) -> &SavedCareer {
        self.entries
            .retain(|saved| saved.recommendation.role_id != recommendation.role_id);
        self.entries.push(SavedCareer {
            recommendation,
            saved_at: Utc::now(),
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Returns the removed entry, or `None` if the role was not saved.
    pub fn remove(&mut self, role_id: &str) -> Option<SavedCareer> {
        let idx = self
            .entries
            .iter()
            .position(|saved| saved.recommendation.role_id == role_id)?;
        Some(self.entries.remove(idx))
    }

    pub fn get(&self, role_id: &str) -> Option<&SavedCareer> {
        self.entries
            .iter()
            .find(|saved| saved.recommendation.role_id == role_id)
    }

    pub fn list(&self, sort: SortBy) -> Vec<SavedCareer> {
        let mut list: Vec<SavedCareer> = self.entries.iter().rev().cloned().collect();
        if sort == SortBy::Match {
            // stable: equal scores stay newest first
            list.sort_by(|a, b| {
                b.recommendation
                    .match_score
                    .total_cmp(&a.recommendation.match_score)
            });
        }
        list
    }
}
