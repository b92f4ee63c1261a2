use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::profile::validation::{validate_input, ValidationErrors};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Student,
    Fresher,
    CareerChange,
}

impl UserType {
    pub const ALL: [UserType; 3] = [UserType::Student, UserType::Fresher, UserType::CareerChange];
}

/// Education levels offered by the intake form.
pub const EDUCATION_LEVELS: &[&str] = &["high_school", "diploma", "bachelors", "masters", "phd"];

/// Education streams offered by the intake form.
pub const EDUCATION_STREAMS: &[&str] = &[
    "science_pcm",
    "science_pcb",
    "cs_it",
    "commerce",
    "arts",
    "vocational",
    "maths",
];

/// Every skill identifier the recommendation service understands.
/// Keys outside this list are dropped by the service, so the client rejects them.
pub const KNOWN_SKILLS: &[&str] = &[
    // technology
    "python",
    "sql",
    "statistics",
    "machine_learning",
    "data_structures",
    "deep_learning",
    "cloud",
    "programming",
    "git",
    "databases",
    "testing",
    // engineering
    "mechanics",
    "cad_tools",
    "manufacturing",
    "automation",
    "structural_analysis",
    "maths",
    "project_management",
    "autocad",
    "site_management",
    // healthcare
    "psychological_assessment",
    "therapy",
    "listening",
    "research",
    "documentation",
    "clinical_medicine",
    "diagnosis",
    "pharmacology",
    "psychotherapy",
    // business
    "accounting",
    "taxation",
    "law",
    "audit",
    "analytics",
    "data_analysis",
    "communication",
    "domain_knowledge",
    // creative
    "writing",
    "digital_media",
    "editing",
    "user_research",
    "wireframing",
    "design_tools",
    "html_css",
    "usability_testing",
    "sketching",
    "fabric_knowledge",
    "creativity",
    "pattern_making",
    "branding",
    // general
    "problem_solving",
];

pub fn is_known_skill(skill: &str) -> bool {
    KNOWN_SKILLS.contains(&skill)
}

/// A self-rated skill level. Construction guarantees `0..=5`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct SkillLevel(u8);

impl SkillLevel {
    pub const MIN: SkillLevel = SkillLevel(0);
    pub const MAX: SkillLevel = SkillLevel(5);

    pub fn new(raw: i64) -> Option<Self> {
        if (Self::MIN.0 as i64..=Self::MAX.0 as i64).contains(&raw) {
            Some(SkillLevel(raw as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for SkillLevel {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        SkillLevel::new(raw).ok_or_else(|| {
            format!(
                "skill level {raw} is outside {}..={}",
                SkillLevel::MIN.0,
                SkillLevel::MAX.0
            )
        })
    }
}

impl From<SkillLevel> for u8 {
    fn from(level: SkillLevel) -> Self {
        level.0
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The profile sent to `POST /recommend-careers`.
///
/// Field names are the wire names. Optional roles serialize as `null` when absent.
/// Values are normally produced by `ProfileDraft::build`, which enforces the same
/// checks as [`UserInput::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInput {
    pub user_type: UserType,
    pub education_level: String,
    pub education_stream: String,
    pub current_role: Option<String>,
    pub target_role: Option<String>,
    pub interests: BTreeSet<String>,
    pub skills: BTreeMap<String, SkillLevel>,
    pub preferred_industries: BTreeSet<String>,
}

impl UserInput {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_input(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skill_level_bounds() {
        assert_eq!(SkillLevel::new(0), Some(SkillLevel::MIN));
        assert_eq!(SkillLevel::new(5), Some(SkillLevel::MAX));
        assert_eq!(SkillLevel::new(-1), None);
        assert_eq!(SkillLevel::new(6), None);
    }

    #[test]
    fn test_skill_level_rejects_out_of_range_json() {
        assert!(serde_json::from_value::<SkillLevel>(json!(6)).is_err());
        assert!(serde_json::from_value::<SkillLevel>(json!(-1)).is_err());
        assert_eq!(
            serde_json::from_value::<SkillLevel>(json!(3)).unwrap().get(),
            3
        );
    }

    #[test]
    fn test_user_type_wire_names() {
        assert_eq!(
            serde_json::to_value(UserType::CareerChange).unwrap(),
            json!("career_change")
        );
        assert_eq!(
            serde_json::from_value::<UserType>(json!("fresher")).unwrap(),
            UserType::Fresher
        );
        assert!(serde_json::from_value::<UserType>(json!("retired")).is_err());
    }

    #[test]
    fn test_absent_roles_serialize_as_null() {
        let input = UserInput {
            user_type: UserType::Student,
            education_level: "bachelors".to_string(),
            education_stream: "cs_it".to_string(),
            current_role: None,
            target_role: None,
            interests: BTreeSet::from(["technology".to_string()]),
            skills: BTreeMap::new(),
            preferred_industries: BTreeSet::from(["finance".to_string()]),
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["current_role"], serde_json::Value::Null);
        assert_eq!(value["target_role"], serde_json::Value::Null);
        assert_eq!(value["interests"], json!(["technology"]));
    }

    #[test]
    fn test_absent_skill_is_level_zero() {
        let input = UserInput {
            user_type: UserType::Fresher,
            education_level: "diploma".to_string(),
            education_stream: "vocational".to_string(),
            current_role: None,
            target_role: None,
            interests: BTreeSet::new(),
            skills: BTreeMap::from([("sketching".to_string(), SkillLevel::new(4).unwrap())]),
            preferred_industries: BTreeSet::new(),
        };
        assert_eq!(input.skills["sketching"].get(), 4);
        assert!(!input.skills.contains_key("branding"));
    }

    #[test]
    fn test_vocabulary_has_no_duplicates() {
        let unique: BTreeSet<_> = KNOWN_SKILLS.iter().collect();
        assert_eq!(unique.len(), KNOWN_SKILLS.len());
        assert!(is_known_skill("problem_solving"));
        assert!(!is_known_skill("juggling"));
    }
}
