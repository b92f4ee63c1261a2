use serde::{Deserialize, Serialize};

/// One career suggested by the recommendation service.
/// Lists of these keep the service's order; the client never re-sorts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub role_id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub match_score: f64, // 0 – 100
    pub why_fit: Vec<String>,
    pub skill_gap: SkillGap,
}

/// A skill the user has rated, with the level the role asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedSkill {
    pub skill: String,
    pub user_level: u8,
    pub req_level: u8,
}

/// A required skill the user has not rated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingSkill {
    pub skill: String,
    pub req_level: u8,
}

/// Partition of a role's relevant skills into three disjoint tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    pub have: Vec<RatedSkill>,
    pub improve: Vec<RatedSkill>,
    pub missing: Vec<MissingSkill>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapTier {
    Have,
    Improve,
    Missing,
}

impl GapTier {
    pub const ALL: [GapTier; 3] = [GapTier::Have, GapTier::Improve, GapTier::Missing];

    pub fn label(self) -> &'static str {
        match self {
            GapTier::Have => "Skills you have",
            GapTier::Improve => "Skills to improve",
            GapTier::Missing => "Skills to learn",
        }
    }
}
