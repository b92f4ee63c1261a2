use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use crate::catalog::RoleCatalog;
use crate::models::profile::SkillLevel;
use crate::models::recommendation::{GapTier, Recommendation};
use crate::recommender::skill_gap::classify;

/// A well-formed JSON response that still breaks the recommendation contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("recommendation #{index} has a blank {field}")]
    BlankField { index: usize, field: &'static str },

    #[error("role '{0}' appears more than once")]
    DuplicateRole(String),

    #[error("role '{role_id}' has match_score {score} outside 0..=100")]
    ScoreOutOfRange { role_id: String, score: f64 },

    #[error("role '{role_id}' rates '{skill}' at level {level}, outside 0..=5")]
    LevelOutOfRange {
        role_id: String,
        skill: String,
        level: u8,
    },

    #[error("role '{role_id}' lists '{skill}' in more than one skill-gap bucket")]
    OverlappingBuckets { role_id: String, skill: String },

    #[error(
        "role '{role_id}' puts '{skill}' under {tier:?} with user level {user_level} and required level {req_level}"
    )]
    Misclassified {
        role_id: String,
        skill: String,
        tier: GapTier,
        user_level: u8,
        req_level: u8,
    },

    #[error("role '{role_id}' skill gap omits required skill '{skill}'")]
    UncoveredSkill { role_id: String, skill: String },

    #[error("role '{role_id}' skill gap lists '{skill}', which the role does not require")]
    UnexpectedSkill { role_id: String, skill: String },
}

/// Checks a decoded response list. Roles found in `catalog` must also have a
/// skill gap covering exactly their required skills.
pub fn validate_recommendations(
    recommendations: &[Recommendation],
    catalog: &RoleCatalog,
) -> Result<(), SchemaViolation> {
    let mut role_ids = HashSet::new();

    for (index, rec) in recommendations.iter().enumerate() {
        for (field, value) in [
            ("role_id", &rec.role_id),
            ("name", &rec.name),
            ("category", &rec.category),
        ] {
            if value.trim().is_empty() {
                return Err(SchemaViolation::BlankField { index, field });
            }
        }

        if !role_ids.insert(rec.role_id.as_str()) {
            return Err(SchemaViolation::DuplicateRole(rec.role_id.clone()));
        }

        if !rec.match_score.is_finite() || !(0.0..=100.0).contains(&rec.match_score) {
            return Err(SchemaViolation::ScoreOutOfRange {
                role_id: rec.role_id.clone(),
                score: rec.match_score,
            });
        }

        validate_skill_gap(rec, catalog)?;
    }

    Ok(())
}

fn validate_skill_gap(rec: &Recommendation, catalog: &RoleCatalog) -> Result<(), SchemaViolation> {
    let gap = &rec.skill_gap;
    let rows = gap
        .have
        .iter()
        .map(|s| (GapTier::Have, s.skill.as_str(), s.user_level, s.req_level))
        .chain(
            gap.improve
                .iter()
                .map(|s| (GapTier::Improve, s.skill.as_str(), s.user_level, s.req_level)),
        )
        .chain(
            gap.missing
                .iter()
                .map(|s| (GapTier::Missing, s.skill.as_str(), 0, s.req_level)),
        );

    let mut seen = BTreeSet::new();
    for (tier, skill, user_level, req_level) in rows {
        if let Some(level) = [user_level, req_level]
            .into_iter()
            .find(|&l| l > SkillLevel::MAX.get())
        {
            return Err(SchemaViolation::LevelOutOfRange {
                role_id: rec.role_id.clone(),
                skill: skill.to_string(),
                level,
            });
        }
        if !seen.insert(skill) {
            return Err(SchemaViolation::OverlappingBuckets {
                role_id: rec.role_id.clone(),
                skill: skill.to_string(),
            });
        }
        if classify(user_level, req_level) != Some(tier) {
            return Err(SchemaViolation::Misclassified {
                role_id: rec.role_id.clone(),
                skill: skill.to_string(),
                tier,
                user_level,
                req_level,
            });
        }
    }

    let Some(role) = catalog.get(&rec.role_id) else {
        return Ok(());
    };

    if let Some(skill) = role
        .required_skills
        .keys()
        .find(|s| !seen.contains(s.as_str()))
    {
        return Err(SchemaViolation::UncoveredSkill {
            role_id: rec.role_id.clone(),
            skill: skill.clone(),
        });
    }
    if let Some(skill) = seen
        .iter()
        .find(|s| !role.required_skills.contains_key(**s))
    {
        return Err(SchemaViolation::UnexpectedSkill {
            role_id: rec.role_id.clone(),
            skill: skill.to_string(),
        });
    }

    Ok(())
}
