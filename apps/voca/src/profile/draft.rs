use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::models::profile::{SkillLevel, UserInput, UserType};
use crate::profile::validation::{
    check_profile_step, check_skill_levels, validate_input, whole_number, FieldError,
    ValidationErrors,
};

/// The in-progress profile. Every field may still be unset; skill levels are kept
/// raw so out-of-range or fractional slider values can be reported instead of
/// silently clamped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDraft {
    pub user_type: Option<UserType>,
    pub education_level: Option<String>,
    pub education_stream: Option<String>,
    pub current_role: Option<String>,
    pub target_role: Option<String>,
    pub interests: BTreeSet<String>,
    pub preferred_industries: BTreeSet<String>,
    pub skills: BTreeMap<String, Number>,
}

/// One user interaction against the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DraftEdit {
    SetUserType { value: UserType },
    SetEducationLevel { value: Option<String> },
    SetEducationStream { value: Option<String> },
    SetCurrentRole { value: Option<String> },
    SetTargetRole { value: Option<String> },
    ToggleInterest { tag: String },
    ToggleIndustry { tag: String },
    SetSkill { skill: String, level: Number },
    ClearSkill { skill: String },
}

impl ProfileDraft {
    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::SetUserType { value } => self.user_type = Some(value),
            DraftEdit::SetEducationLevel { value } => self.education_level = non_blank(value),
            DraftEdit::SetEducationStream { value } => self.education_stream = non_blank(value),
            DraftEdit::SetCurrentRole { value } => self.current_role = non_blank(value),
            DraftEdit::SetTargetRole { value } => self.target_role = non_blank(value),
            DraftEdit::ToggleInterest { tag } => {
                toggle(&mut self.interests, &tag);
            }
            DraftEdit::ToggleIndustry { tag } => {
                toggle(&mut self.preferred_industries, &tag);
            }
            DraftEdit::SetSkill { skill, level } => {
                self.skills.insert(skill.trim().to_string(), level);
            }
            DraftEdit::ClearSkill { skill } => {
                self.skills.remove(skill.trim());
            }
        }
    }

    /// Trims text fields, turns blanks into `None` and drops blank tags.
    /// Skill keys are left alone; `build` trims them and reports collisions.
    pub fn normalized(mut self) -> Self {
        self.education_level = non_blank(self.education_level);
        self.education_stream = non_blank(self.education_stream);
        self.current_role = non_blank(self.current_role);
        self.target_role = non_blank(self.target_role);
        self.interests = normalize_tags(self.interests);
        self.preferred_industries = normalize_tags(self.preferred_industries);
        self
    }

    /// Assembles a `UserInput`, reporting every offending field at once.
    pub fn build(&self) -> Result<UserInput, ValidationErrors> {
        let mut draft = self.clone().normalized();
        let (skills, collisions) = trim_skill_keys(std::mem::take(&mut draft.skills));

        let mut errors = check_profile_step(&draft);
        errors.extend(collisions);
        errors.extend(check_skill_levels(&skills));

        let input = match (
            draft.user_type,
            draft.education_level,
            draft.education_stream,
        ) {
            (Some(user_type), Some(education_level), Some(education_stream))
                if errors.is_empty() =>
            {
                UserInput {
                    user_type,
                    education_level,
                    education_stream,
                    current_role: draft.current_role,
                    target_role: draft.target_role,
                    interests: draft.interests,
                    skills: skills
                        .into_iter()
                        .filter_map(|(skill, raw)| {
                            whole_number(&raw)
                                .and_then(SkillLevel::new)
                                .map(|level| (skill, level))
                        })
                        .collect(),
                    preferred_industries: draft.preferred_industries,
                }
            }
            _ => return Err(ValidationErrors { fields: errors }),
        };

        validate_input(&input)?;
        Ok(input)
    }
}

/// Trims skill names. Two keys that trim to the same name are an error rather
/// than one silently replacing the other.
fn trim_skill_keys(
    raw: BTreeMap<String, Number>,
) -> (BTreeMap<String, Number>, Vec<FieldError>) {
    let mut skills = BTreeMap::new();
    let mut errors = Vec::new();
    for (key, level) in raw {
        let name = key.trim().to_string();
        if skills.contains_key(&name) {
            errors.push(FieldError::new(
                format!("skills.{name}"),
                format!("Skill '{name}' is rated more than once"),
            ));
        } else {
            skills.insert(name, level);
        }
    }
    (skills, errors)
}

/// Flips membership of `tag`. Returns whether it is selected afterwards.
fn toggle(tags: &mut BTreeSet<String>, tag: &str) -> bool {
    let tag = tag.trim();
    if tag.is_empty() {
        return false;
    }
    if tags.remove(tag) {
        false
    } else {
        tags.insert(tag.to_string());
        true
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_tags(tags: BTreeSet<String>) -> BTreeSet<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> ProfileDraft {
        let mut draft = ProfileDraft::default();
        for edit in [
            DraftEdit::SetUserType {
                value: UserType::Student,
            },
            DraftEdit::SetEducationLevel {
                value: Some("bachelors".to_string()),
            },
            DraftEdit::SetEducationStream {
                value: Some("cs_it".to_string()),
            },
            DraftEdit::ToggleInterest {
                tag: "technology".to_string(),
            },
            DraftEdit::ToggleIndustry {
                tag: "startups".to_string(),
            },
            DraftEdit::SetSkill {
                skill: "programming".to_string(),
                level: Number::from(4),
            },
        ] {
            draft.apply(edit);
        }
        draft
    }

    #[test]
    fn test_build_complete_draft() {
        let input = filled_draft().build().unwrap();
        assert_eq!(input.user_type, UserType::Student);
        assert_eq!(input.skills["programming"].get(), 4);
        assert_eq!(input.current_role, None);
        assert!(input.interests.contains("technology"));
    }

    #[test]
    fn test_blank_role_becomes_none() {
        let mut draft = filled_draft();
        draft.apply(DraftEdit::SetCurrentRole {
            value: Some("   ".to_string()),
        });
        draft.apply(DraftEdit::SetTargetRole {
            value: Some(" Data Scientist ".to_string()),
        });
        let input = draft.build().unwrap();
        assert_eq!(input.current_role, None);
        assert_eq!(input.target_role.as_deref(), Some("Data Scientist"));
    }

    #[test]
    fn test_toggle_twice_removes_tag() {
        let mut draft = filled_draft();
        draft.apply(DraftEdit::ToggleInterest {
            tag: "design".to_string(),
        });
        assert!(draft.interests.contains("design"));
        draft.apply(DraftEdit::ToggleInterest {
            tag: " design".to_string(),
        });
        assert!(!draft.interests.contains("design"));
    }

    #[test]
    fn test_level_boundaries_on_build() {
        for (level, ok) in [(0, true), (5, true), (-1, false), (6, false)] {
            let mut draft = filled_draft();
            draft.apply(DraftEdit::SetSkill {
                skill: "python".to_string(),
                level: Number::from(level),
            });
            assert_eq!(draft.build().is_ok(), ok, "level {level}");
        }
    }

    #[test]
    fn test_out_of_range_reports_offending_field() {
        let mut draft = filled_draft();
        draft.apply(DraftEdit::SetSkill {
            skill: "sql".to_string(),
            level: Number::from(9),
        });
        let err = draft.build().unwrap_err();
        assert!(err.field("skills.sql").is_some());
    }

    #[test]
    fn test_missing_profile_fields_all_reported() {
        let mut draft = ProfileDraft::default();
        draft.apply(DraftEdit::SetSkill {
            skill: "sql".to_string(),
            level: Number::from(7),
        });
        let err = draft.build().unwrap_err();
        assert_eq!(err.fields.len(), 4);
    }

    #[test]
    fn test_deserialized_blanks_are_normalized() {
        let draft: ProfileDraft = serde_json::from_value(serde_json::json!({
            "user_type": "fresher",
            "education_level": "diploma",
            "education_stream": "vocational",
            "current_role": "",
            "interests": ["", "fashion"],
            "preferred_industries": ["retail"]
        }))
        .unwrap();
        let input = draft.build().unwrap();
        assert_eq!(input.current_role, None);
        assert_eq!(input.interests.len(), 1);
    }

    #[test]
    fn test_clear_skill_resets_to_unrated() {
        let mut draft = filled_draft();
        draft.apply(DraftEdit::ClearSkill {
            skill: "programming".to_string(),
        });
        let input = draft.build().unwrap();
        assert!(!input.skills.contains_key("programming"));
    }

    #[test]
    fn test_keys_colliding_after_trim_are_reported() {
        let mut draft = filled_draft();
        draft.skills = serde_json::from_str(r#"{ " sql": 6, "sql": 2 }"#).unwrap();
        let err = draft.build().unwrap_err();
        let field = err.field("skills.sql").unwrap();
        assert!(field.message.contains("more than once"));
    }

    #[test]
    fn test_padded_skill_key_is_trimmed() {
        let mut draft = filled_draft();
        draft.skills = serde_json::from_str(r#"{ " sql ": 3 }"#).unwrap();
        let input = draft.build().unwrap();
        assert_eq!(input.skills["sql"].get(), 3);
    }

    #[test]
    fn test_fractional_level_rejected_on_build() {
        let mut draft = filled_draft();
        draft.skills = serde_json::from_str(r#"{ "sql": 2.5 }"#).unwrap();
        let err = draft.build().unwrap_err();
        assert!(err.field("skills.sql").is_some());
    }
}
