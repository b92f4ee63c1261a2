use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::recommendation::Recommendation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub title: String,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roadmap {
    pub role_id: String,
    pub role_name: String,
    pub milestones: Vec<Milestone>,
    pub created_at: DateTime<Utc>,
}

/// Hands out `task-1`, `task-2`, ... across the whole roadmap.
struct TaskIds(usize);

impl TaskIds {
    fn task(&mut self, text: String) -> Task {
        self.0 += 1;
        Task {
            id: format!("task-{}", self.0),
            text,
            completed: false,
        }
    }
}

impl Roadmap {
    pub fn new(
        role_id: impl Into<String>,
        role_name: impl Into<String>,
        milestones: Vec<Milestone>,
    ) -> Self {
        Self {
            role_id: role_id.into(),
            role_name: role_name.into(),
            milestones: milestones
                .into_iter()
                .filter(|m| !m.tasks.is_empty())
                .collect(),
            created_at: Utc::now(),
        }
    }

    /// Missing skills become foundation tasks, skills to improve become practice
    /// tasks, followed by portfolio and job-preparation work.
    pub fn from_recommendation(rec: &Recommendation) -> Self {
        let mut ids = TaskIds(0);
        let name = &rec.name;

        let foundations = Milestone {
            title: "Build foundations".into(),
            tasks: rec
                .skill_gap
                .missing
                .iter()
                .map(|s| ids.task(format!("Learn {} up to level {}", s.skill, s.req_level)))
                .collect(),
        };
        let practice = Milestone {
            title: "Level up your skills".into(),
            tasks: rec
                .skill_gap
                .improve
                .iter()
                .map(|s| {
                    ids.task(format!(
                        "Improve {} from level {} to {}",
                        s.skill, s.user_level, s.req_level
                    ))
                })
                .collect(),
        };
        let portfolio = Milestone {
            title: "Build a portfolio".into(),
            tasks: vec![
                ids.task(format!("Complete a project that shows {name} skills")),
                ids.task("Publish your work where recruiters can see it".into()),
            ],
        };
        let job_prep = Milestone {
            title: "Prepare for the job search".into(),
            tasks: vec![
                ids.task(format!("Tailor your resume for {name} roles")),
                ids.task(format!("Practice common {name} interview questions")),
                ids.task(format!("Apply to entry-level {name} positions")),
            ],
        };

        Self::new(
            rec.role_id.clone(),
            name.clone(),
            vec![foundations, practice, portfolio, job_prep],
        )
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.milestones.iter().flat_map(|m| m.tasks.iter())
    }

    /// Flips a task and returns its new state, or `None` if no task has `id`.
    pub fn toggle_task(&mut self, id: &str) -> Option<bool> {
        let task = self
            .milestones
            .iter_mut()
            .flat_map(|m| m.tasks.iter_mut())
            .find(|t| t.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Percentage of completed tasks, rounded; 0 for an empty roadmap.
    pub fn progress(&self) -> u8 {
        let total = self.tasks().count();
        if total == 0 {
            return 0;
        }
        let done = self.tasks().filter(|t| t.completed).count();
        ((done as f64 / total as f64) * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recommendation::{MissingSkill, RatedSkill, SkillGap};

    fn rec(gap: SkillGap) -> Recommendation {
        Recommendation {
            role_id: "data_analyst".into(),
            name: "Data Analyst".into(),
            category: "Data".into(),
            description: String::new(),
            match_score: 72.0,
            why_fit: vec![],
            skill_gap: gap,
        }
    }

    fn sample_gap() -> SkillGap {
        SkillGap {
            have: vec![RatedSkill {
                skill: "Excel".into(),
                user_level: 4,
                req_level: 3,
            }],
            improve: vec![RatedSkill {
                skill: "SQL".into(),
                user_level: 1,
                req_level: 3,
            }],
            missing: vec![
                MissingSkill {
                    skill: "Python".into(),
                    req_level: 3,
                },
                MissingSkill {
                    skill: "Statistics".into(),
                    req_level: 2,
                },
            ],
        }
    }

    #[test]
    fn test_milestones_follow_skill_gap() {
        let roadmap = Roadmap::from_recommendation(&rec(sample_gap()));
        let titles: Vec<&str> = roadmap
            .milestones
            .iter()
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(
            titles,
            [
                "Build foundations",
                "Level up your skills",
                "Build a portfolio",
                "Prepare for the job search"
            ]
        );
        assert_eq!(roadmap.milestones[0].tasks.len(), 2);
        assert!(roadmap.milestones[0].tasks[0].text.contains("Python"));
        assert!(roadmap.milestones[1].tasks[0].text.contains("SQL"));
    }

    #[test]
    fn test_empty_milestones_omitted() {
        let roadmap = Roadmap::from_recommendation(&rec(SkillGap::default()));
        assert_eq!(roadmap.milestones.len(), 2);
        assert_eq!(roadmap.milestones[0].title, "Build a portfolio");
    }

    #[test]
    fn test_task_ids_unique() {
        let roadmap = Roadmap::from_recommendation(&rec(sample_gap()));
        let mut ids: Vec<&str> = roadmap.tasks().map(|t| t.id.as_str()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_toggle_flips_completion() {
        let mut roadmap = Roadmap::from_recommendation(&rec(sample_gap()));
        assert_eq!(roadmap.toggle_task("task-1"), Some(true));
        assert!(roadmap.milestones[0].tasks[0].completed);
        assert_eq!(roadmap.toggle_task("task-1"), Some(false));
        assert_eq!(roadmap.toggle_task("task-99"), None);
    }

    #[test]
    fn test_progress_rounds() {
        // 2 + 1 + 2 + 3 = 8 tasks
        let mut roadmap = Roadmap::from_recommendation(&rec(sample_gap()));
        assert_eq!(roadmap.progress(), 0);
        roadmap.toggle_task("task-1");
        assert_eq!(roadmap.progress(), 13); // 12.5
        for id in ["task-2", "task-3"] {
            roadmap.toggle_task(id);
        }
        assert_eq!(roadmap.progress(), 38); // 37.5
        assert!(roadmap.milestones[0].tasks.iter().all(|t| t.completed));
    }

    #[test]
    fn test_empty_roadmap_progress_is_zero() {
        let roadmap = Roadmap::new("x", "X", vec![]);
        assert_eq!(roadmap.progress(), 0);
    }
}
