use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::requests::{CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::errors::{AssessError, Result};
use crate::models::assignment_submissions::entities::RubricScore;
use crate::models::quizzes::entities::PublishStatus;

// 评分细则中的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct RubricCriterion {
    pub criterion: String,
    pub max_points: f64,
    pub description: Option<String>,
}

// 作业实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub max_score: f64,
    pub rubric: Option<Vec<RubricCriterion>>,
    pub allow_late_submission: bool,
    pub ai_grading_enabled: bool,
    pub status: PublishStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub const DEFAULT_MAX_SCORE: f64 = 100.0;

impl Assignment {
    pub fn from_request(
        id: i64,
        req: CreateAssignmentRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            id,
            course_id: req.course_id,
            title: req.title,
            description: req.description,
            instructions: req.instructions,
            due_date: req.due_date,
            max_score: req.max_score.unwrap_or(DEFAULT_MAX_SCORE),
            rubric: req.rubric,
            allow_late_submission: req.allow_late_submission.unwrap_or(false),
            ai_grading_enabled: req.ai_grading_enabled.unwrap_or(false),
            status: req.status.unwrap_or(PublishStatus::Draft),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(
        &mut self,
        update: UpdateAssignmentRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(instructions) = update.instructions {
            self.instructions = Some(instructions);
        }
        if let Some(due_date) = update.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(max_score) = update.max_score {
            self.max_score = max_score;
        }
        if let Some(rubric) = update.rubric {
            self.rubric = Some(rubric);
        }
        if let Some(v) = update.allow_late_submission {
            self.allow_late_submission = v;
        }
        if let Some(v) = update.ai_grading_enabled {
            self.ai_grading_enabled = v;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = now;
    }

    pub fn find_criterion(&self, name: &str) -> Option<&RubricCriterion> {
        self.rubric
            .as_ref()?
            .iter()
            .find(|c| c.criterion.trim().eq_ignore_ascii_case(name.trim()))
    }

    /// 按 max_score 折算为整数百分比
    pub fn percentage_of(&self, score: f64) -> Option<i32> {
        if self.max_score <= 0.0 {
            return None;
        }
        Some((score / self.max_score * 100.0).round() as i32)
    }

    /// 校验评分：总分在 0..=max_score 内，细则得分必须对应已有细则且不超过该项满分
    pub fn validate_grade(&self, score: f64, rubric_scores: Option<&[RubricScore]>) -> Result<()> {
        if !score.is_finite() || score < 0.0 || score > self.max_score {
            return Err(AssessError::validation(format!(
                "Score must be between 0 and {}",
                self.max_score
            )));
        }
        for item in rubric_scores.unwrap_or_default() {
            let Some(criterion) = self.find_criterion(&item.criterion) else {
                return Err(AssessError::validation(format!(
                    "Unknown rubric criterion: {}",
                    item.criterion
                )));
            };
            if !item.score.is_finite() || item.score < 0.0 || item.score > criterion.max_points {
                return Err(AssessError::validation(format!(
                    "Score for '{}' must be between 0 and {}",
                    criterion.criterion, criterion.max_points
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment() -> Assignment {
        let req: CreateAssignmentRequest = serde_json::from_value(serde_json::json!({
            "courseId": 1,
            "title": "Essay",
            "maxScore": 50.0,
            "rubric": [
                {"criterion": "Clarity", "maxPoints": 20.0, "description": null},
                {"criterion": "Evidence", "maxPoints": 30.0, "description": "Sources cited"}
            ]
        }))
        .unwrap();
        Assignment::from_request(1, req, chrono::Utc::now())
    }

    #[test]
    fn test_assignment_defaults() {
        let req: CreateAssignmentRequest =
            serde_json::from_str(r#"{"courseId": 1, "title": "Lab"}"#).unwrap();
        let a = Assignment::from_request(2, req, chrono::Utc::now());
        assert_eq!(a.max_score, 100.0);
        assert_eq!(a.status, PublishStatus::Draft);
        assert!(!a.allow_late_submission);
        assert!(!a.ai_grading_enabled);
        assert!(a.rubric.is_none());
    }

    #[test]
    fn test_percentage_of_rounds() {
        let a = assignment();
        assert_eq!(a.percentage_of(45.0), Some(90));
        assert_eq!(a.percentage_of(33.3), Some(67));
    }

    #[test]
    fn test_find_criterion() {
        let a = assignment();
        assert!(a.find_criterion("clarity").is_some());
        assert!(a.find_criterion("Style").is_none());
    }

    #[test]
    fn test_validate_grade() {
        let a = assignment();
        let scores = |criterion: &str, score: f64| {
            vec![RubricScore {
                criterion: criterion.to_string(),
                score,
                feedback: None,
            }]
        };
        assert!(a.validate_grade(40.0, Some(&scores("Clarity", 18.0))).is_ok());
        assert!(a.validate_grade(51.0, None).is_err());
        assert!(a.validate_grade(-1.0, None).is_err());
        assert!(a.validate_grade(40.0, Some(&scores("Style", 5.0))).is_err());
        assert!(a.validate_grade(40.0, Some(&scores("Evidence", 31.0))).is_err());
    }
}
