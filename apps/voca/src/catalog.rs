//! Role catalog. The requirement table behind the recommendation service,
//! embedded at build time.
//!
//! The service stays authoritative for scoring. The catalog is only read to preview
//! a skill gap before submission and to check that a returned skill gap covers every
//! skill the role requires.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::profile::{is_known_skill, SkillLevel};

const EMBEDDED_CATALOG: &str = include_str!("../data/careers.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub preferred_streams: Vec<String>,
    #[serde(default)]
    pub good_for_interests: Vec<String>,
    pub required_skills: BTreeMap<String, u8>,
    #[serde(default)]
    pub nice_to_have: BTreeMap<String, u8>,
    #[serde(default)]
    pub industries: Vec<String>,
    pub description: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("role '{0}' is listed more than once")]
    DuplicateRole(String),

    #[error("role '{role}' requires unknown skill '{skill}'")]
    UnknownSkill { role: String, skill: String },

    #[error("role '{role}' requires '{skill}' at level {level}, outside 1..=5")]
    LevelOutOfRange {
        role: String,
        skill: String,
        level: u8,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RoleCatalog {
    roles: Vec<RoleProfile>,
}

impl RoleCatalog {
    /// Loads the catalog compiled into the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let roles: Vec<RoleProfile> = serde_json::from_str(json)?;
        Self::new(roles)
    }

    pub fn new(roles: Vec<RoleProfile>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for role in &roles {
            if !seen.insert(role.id.as_str()) {
                return Err(CatalogError::DuplicateRole(role.id.clone()));
            }
            for (skill, &level) in role.required_skills.iter().chain(&role.nice_to_have) {
                if !is_known_skill(skill) {
                    return Err(CatalogError::UnknownSkill {
                        role: role.id.clone(),
                        skill: skill.clone(),
                    });
                }
                if level == 0 || level > SkillLevel::MAX.get() {
                    return Err(CatalogError::LevelOutOfRange {
                        role: role.id.clone(),
                        skill: skill.clone(),
                        level,
                    });
                }
            }
        }
        Ok(Self { roles })
    }

    pub fn get(&self, role_id: &str) -> Option<&RoleProfile> {
        self.roles.iter().find(|r| r.id == role_id)
    }

    pub fn roles(&self) -> &[RoleProfile] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_loads() {
        let catalog = RoleCatalog::embedded().unwrap();
        assert_eq!(catalog.len(), 12);
        let dev = catalog.get("software_developer").unwrap();
        assert_eq!(dev.required_skills.get("programming"), Some(&4));
        assert!(catalog.get("astronaut").is_none());
    }

    #[test]
    fn test_duplicate_role_rejected() {
        let json = r#"[
            {"id": "a", "name": "A", "category": "x", "required_skills": {}, "description": "d"},
            {"id": "a", "name": "A2", "category": "x", "required_skills": {}, "description": "d"}
        ]"#;
        assert!(matches!(
            RoleCatalog::from_json(json),
            Err(CatalogError::DuplicateRole(id)) if id == "a"
        ));
    }

    #[test]
    fn test_unknown_required_skill_rejected() {
        let json = r#"[{"id": "a", "name": "A", "category": "x",
            "required_skills": {"telepathy": 3}, "description": "d"}]"#;
        assert!(matches!(
            RoleCatalog::from_json(json),
            Err(CatalogError::UnknownSkill { .. })
        ));
    }

    #[test]
    fn test_zero_required_level_rejected() {
        let json = r#"[{"id": "a", "name": "A", "category": "x",
            "required_skills": {"python": 0}, "description": "d"}]"#;
        assert!(matches!(
            RoleCatalog::from_json(json),
            Err(CatalogError::LevelOutOfRange { level: 0, .. })
        ));
    }
}
