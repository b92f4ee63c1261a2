//! Skill-gap tiers.
//!
//! The recommendation service decides bucket membership. The same rule is mirrored
//! here for two read-only uses: previewing a gap before submission, and checking that
//! a returned gap is internally consistent.
//!
//! | tier      | rule                                  |
//! |-----------|---------------------------------------|
//! | `have`    | `user_level >= req_level`, `user > 0` |
//! | `improve` | `0 < user_level < req_level`          |
//! | `missing` | `user_level == 0`, `req_level > 0`    |

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::profile::SkillLevel;
use crate::models::recommendation::{GapTier, MissingSkill, RatedSkill, Recommendation, SkillGap};

/// Tier for a skill, or `None` when the skill is irrelevant (nothing rated, nothing required).
pub fn classify(user_level: u8, req_level: u8) -> Option<GapTier> {
    if user_level > 0 && user_level >= req_level {
        Some(GapTier::Have)
    } else if user_level > 0 {
        Some(GapTier::Improve)
    } else if req_level > 0 {
        Some(GapTier::Missing)
    } else {
        None
    }
}

/// Buckets `required` against the user's ratings. Absent ratings count as 0.
pub fn preview(
    skills: &BTreeMap<String, SkillLevel>,
    required: &BTreeMap<String, u8>,
) -> SkillGap {
    let mut gap = SkillGap::default();

    for (skill, &req_level) in required {
        let user_level = skills.get(skill).copied().unwrap_or_default().get();
        match classify(user_level, req_level) {
            Some(GapTier::Have) => gap.have.push(RatedSkill {
                skill: skill.clone(),
                user_level,
                req_level,
            }),
            Some(GapTier::Improve) => gap.improve.push(RatedSkill {
                skill: skill.clone(),
                user_level,
                req_level,
            }),
            Some(GapTier::Missing) => gap.missing.push(MissingSkill {
                skill: skill.clone(),
                req_level,
            }),
            None => {}
        }
    }

    gap
}

/// One row of a rendered tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapLine {
    pub skill: String,
    pub user_level: Option<u8>,
    pub req_level: u8,
    /// Levels still to gain; 0 for skills already met.
    pub shortfall: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapGroup {
    pub tier: GapTier,
    pub label: &'static str,
    pub skills: Vec<GapLine>,
}

/// Always three groups in `have, improve, missing` order; rows keep service order.
pub fn group_for_display(gap: &SkillGap) -> Vec<GapGroup> {
    GapTier::ALL
        .into_iter()
        .map(|tier| {
            let skills = match tier {
                GapTier::Have => gap.have.iter().map(rated_line).collect(),
                GapTier::Improve => gap.improve.iter().map(rated_line).collect(),
                GapTier::Missing => gap
                    .missing
                    .iter()
                    .map(|m| GapLine {
                        skill: m.skill.clone(),
                        user_level: None,
                        req_level: m.req_level,
                        shortfall: m.req_level,
                    })
                    .collect(),
            };
            GapGroup {
                tier,
                label: tier.label(),
                skills,
            }
        })
        .collect()
}

/// A recommendation as rendered: the service payload plus its grouped tiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationView {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub skill_groups: Vec<GapGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Matched,
    NoMatches,
}

/// The results screen. An empty list is `no_matches`, never an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub status: ResultStatus,
    pub recommendations: Vec<RecommendationView>,
}

impl ResultsView {
    pub fn new(recommendations: &[Recommendation]) -> Self {
        let status = if recommendations.is_empty() {
            ResultStatus::NoMatches
        } else {
            ResultStatus::Matched
        };
        Self {
            status,
            recommendations: recommendations
                .iter()
                .map(|r| RecommendationView {
                    recommendation: r.clone(),
                    skill_groups: group_for_display(&r.skill_gap),
                })
                .collect(),
        }
    }
}

fn rated_line(s: &RatedSkill) -> GapLine {
    GapLine {
        skill: s.skill.clone(),
        user_level: Some(s.user_level),
        req_level: s.req_level,
        shortfall: s.req_level.saturating_sub(s.user_level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn levels(pairs: &[(&str, i64)]) -> BTreeMap<String, SkillLevel> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), SkillLevel::new(*v).unwrap()))
            .collect()
    }

    fn required(pairs: &[(&str, u8)]) -> BTreeMap<String, u8> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_classify_rules() {
        assert_eq!(classify(4, 3), Some(GapTier::Have));
        assert_eq!(classify(3, 3), Some(GapTier::Have));
        assert_eq!(classify(2, 3), Some(GapTier::Improve));
        assert_eq!(classify(0, 3), Some(GapTier::Missing));
        assert_eq!(classify(0, 0), None);
        assert_eq!(classify(1, 0), Some(GapTier::Have));
    }

    #[test]
    fn test_preview_buckets_against_requirements() {
        let gap = preview(
            &levels(&[("python", 5), ("sql", 1), ("cloud", 3)]),
            &required(&[
                ("python", 4),
                ("sql", 3),
                ("statistics", 3),
                ("machine_learning", 3),
            ]),
        );

        assert_eq!(gap.have.len(), 1);
        assert_eq!(gap.have[0].skill, "python");
        assert_eq!(gap.improve.len(), 1);
        assert_eq!(gap.improve[0].user_level, 1);
        let missing: Vec<_> = gap.missing.iter().map(|m| m.skill.as_str()).collect();
        assert_eq!(missing, vec!["machine_learning", "statistics"]);
    }

    #[test]
    fn test_preview_is_a_partition_of_required() {
        let req = required(&[("writing", 4), ("research", 3), ("communication", 3)]);
        let gap = preview(&levels(&[("writing", 4), ("research", 0)]), &req);

        let named: Vec<&str> = gap
            .have
            .iter()
            .chain(&gap.improve)
            .map(|s| s.skill.as_str())
            .chain(gap.missing.iter().map(|s| s.skill.as_str()))
            .collect();
        let unique: HashSet<&str> = named.iter().copied().collect();
        assert_eq!(named.len(), unique.len(), "buckets overlap");
        let expected: HashSet<&str> = req.keys().map(String::as_str).collect();
        assert_eq!(unique, expected);
    }

    #[test]
    fn test_explicit_zero_counts_as_missing() {
        let gap = preview(&levels(&[("git", 0)]), &required(&[("git", 2)]));
        assert_eq!(gap.missing.len(), 1);
        assert!(gap.have.is_empty() && gap.improve.is_empty());
    }

    #[test]
    fn test_empty_results_are_no_matches() {
        let view = ResultsView::new(&[]);
        assert_eq!(view.status, ResultStatus::NoMatches);
        assert!(view.recommendations.is_empty());
    }

    #[test]
    fn test_group_for_display_keeps_order_and_shortfall() {
        let gap = SkillGap {
            have: vec![],
            improve: vec![
                RatedSkill {
                    skill: "therapy".to_string(),
                    user_level: 2,
                    req_level: 4,
                },
                RatedSkill {
                    skill: "listening".to_string(),
                    user_level: 3,
                    req_level: 4,
                },
            ],
            missing: vec![MissingSkill {
                skill: "psychological_assessment".to_string(),
                req_level: 4,
            }],
        };

        let groups = group_for_display(&gap);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].tier, GapTier::Have);
        assert!(groups[0].skills.is_empty());
        assert_eq!(groups[1].skills[0].skill, "therapy");
        assert_eq!(groups[1].skills[0].shortfall, 2);
        assert_eq!(groups[2].skills[0].user_level, None);
        assert_eq!(groups[2].skills[0].shortfall, 4);
    }
}
