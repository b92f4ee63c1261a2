use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;
use thiserror::Error;

use crate::models::profile::{is_known_skill, SkillLevel, UserInput};
use crate::profile::draft::ProfileDraft;

/// A single offending field, reported so the UI can flag it inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("profile has {} invalid field(s)", .fields.len())]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    /// `Ok(())` when `fields` is empty.
    pub fn check(fields: Vec<FieldError>) -> Result<(), Self> {
        if fields.is_empty() {
            Ok(())
        } else {
            Err(Self { fields })
        }
    }

    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.fields.iter().find(|f| f.field == name)
    }
}

/// Step 1 gate: user type, education level and stream are all set.
pub fn check_profile_step(draft: &ProfileDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if draft.user_type.is_none() {
        errors.push(FieldError::new("user_type", "Select who you are"));
    }
    if draft.education_level.is_none() {
        errors.push(FieldError::new(
            "education_level",
            "Select your education level",
        ));
    }
    if draft.education_stream.is_none() {
        errors.push(FieldError::new(
            "education_stream",
            "Select your education stream",
        ));
    }
    errors
}

/// Step 2 gate: at least one interest and one preferred industry.
pub fn check_interests_step(draft: &ProfileDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if draft.interests.is_empty() {
        errors.push(FieldError::new("interests", "Pick at least one interest"));
    }
    if draft.preferred_industries.is_empty() {
        errors.push(FieldError::new(
            "preferred_industries",
            "Pick at least one industry",
        ));
    }
    errors
}

/// Integral value of a raw slider reading. `2.0` counts, `2.5` does not.
pub fn whole_number(raw: &Number) -> Option<i64> {
    raw.as_i64().or_else(|| {
        raw.as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Raw slider values must be whole numbers in range and name a known skill.
pub fn check_skill_levels(skills: &BTreeMap<String, Number>) -> Vec<FieldError> {
    skills
        .iter()
        .filter_map(|(skill, raw)| {
            let field = format!("skills.{skill}");
            if !is_known_skill(skill) {
                return Some(FieldError::new(field, format!("Unknown skill '{skill}'")));
            }
            match whole_number(raw) {
                None => Some(FieldError::new(
                    field,
                    format!("Level {raw} must be a whole number"),
                )),
                Some(level) if SkillLevel::new(level).is_none() => Some(FieldError::new(
                    field,
                    format!(
                        "Level {level} is outside {}..={}",
                        SkillLevel::MIN,
                        SkillLevel::MAX
                    ),
                )),
                Some(_) => None,
            }
        })
        .collect()
}

/// Re-checks an assembled profile right before it leaves the process.
pub fn validate_input(input: &UserInput) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if input.education_level.trim().is_empty() {
        errors.push(FieldError::new(
            "education_level",
            "Education level must not be blank",
        ));
    }
    if input.education_stream.trim().is_empty() {
        errors.push(FieldError::new(
            "education_stream",
            "Education stream must not be blank",
        ));
    }
    for (field, value) in [
        ("current_role", &input.current_role),
        ("target_role", &input.target_role),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            errors.push(FieldError::new(field, "Leave blank roles unset, not empty"));
        }
    }
    for (field, tags) in [
        ("interests", &input.interests),
        ("preferred_industries", &input.preferred_industries),
    ] {
        if tags.iter().any(|t| t.trim().is_empty()) {
            errors.push(FieldError::new(field, "Tags must not be blank"));
        }
    }
    for skill in input.skills.keys() {
        if !is_known_skill(skill) {
            errors.push(FieldError::new(
                format!("skills.{skill}"),
                format!("Unknown skill '{skill}'"),
            ));
        }
    }

    ValidationErrors::check(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::UserType;
    use std::collections::BTreeSet;

    fn valid_input() -> UserInput {
        UserInput {
            user_type: UserType::CareerChange,
            education_level: "masters".to_string(),
            education_stream: "commerce".to_string(),
            current_role: Some("Accountant".to_string()),
            target_role: None,
            interests: BTreeSet::from(["finance".to_string()]),
            skills: BTreeMap::from([("accounting".to_string(), SkillLevel::new(5).unwrap())]),
            preferred_industries: BTreeSet::from(["consulting".to_string()]),
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate_input(&valid_input()).is_ok());
    }

    #[test]
    fn test_empty_role_string_rejected() {
        let mut input = valid_input();
        input.target_role = Some("  ".to_string());
        let err = validate_input(&input).unwrap_err();
        assert!(err.field("target_role").is_some());
    }

    #[test]
    fn test_unknown_skill_rejected() {
        let mut input = valid_input();
        input
            .skills
            .insert("juggling".to_string(), SkillLevel::new(2).unwrap());
        let err = validate_input(&input).unwrap_err();
        assert!(err.field("skills.juggling").is_some());
    }

    #[test]
    fn test_blank_education_reports_both_fields() {
        let mut input = valid_input();
        input.education_level = String::new();
        input.education_stream = " ".to_string();
        let err = validate_input(&input).unwrap_err();
        assert_eq!(err.fields.len(), 2);
    }

    #[test]
    fn test_skill_level_boundaries() {
        let skills = BTreeMap::from([
            ("python".to_string(), Number::from(0)),
            ("sql".to_string(), Number::from(5)),
            ("git".to_string(), Number::from(-1)),
            ("cloud".to_string(), Number::from(6)),
        ]);
        let errors = check_skill_levels(&skills);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["skills.cloud", "skills.git"]);
    }

    #[test]
    fn test_fractional_level_reported_per_field() {
        let skills: BTreeMap<String, Number> =
            serde_json::from_str(r#"{ "sql": 2.5, "python": 3.0 }"#).unwrap();
        let errors = check_skill_levels(&skills);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "skills.sql");
        assert!(errors[0].message.contains("whole number"));
    }

    #[test]
    fn test_step_gates_on_empty_draft() {
        let draft = ProfileDraft::default();
        assert_eq!(check_profile_step(&draft).len(), 3);
        assert_eq!(check_interests_step(&draft).len(), 2);
    }
}
