use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::requests::{CreateQuizSubmissionRequest, UpdateQuizSubmissionRequest};
use crate::errors::Result;
use crate::models::common::SubmissionStatus;

// 单题作答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub answer: String,
}

// 测验提交（一次作答尝试）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct QuizSubmission {
    pub id: i64,
    pub quiz_id: i64,
    pub student_id: i64,
    pub answers: Vec<SubmittedAnswer>,
    pub score: Option<f64>,
    pub total_points: Option<f64>,
    pub percentage: Option<i32>,
    pub passed: Option<bool>,
    pub status: SubmissionStatus,
    pub attempt_number: i32,
    // 用时（秒）
    pub time_spent: Option<i32>,
    pub feedback: Option<String>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl QuizSubmission {
    pub fn from_request(
        id: i64,
        req: CreateQuizSubmissionRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let status = req.status.unwrap_or(SubmissionStatus::InProgress);
        Self {
            id,
            quiz_id: req.quiz_id,
            student_id: req.student_id,
            answers: req.answers.unwrap_or_default(),
            score: None,
            total_points: None,
            percentage: None,
            passed: None,
            status,
            attempt_number: req.attempt_number.unwrap_or(1),
            time_spent: None,
            feedback: None,
            started_at: now,
            submitted_at: (status != SubmissionStatus::InProgress).then_some(now),
            graded_at: (status == SubmissionStatus::Graded).then_some(now),
        }
    }

    /// 合并更新；状态回退时返回错误且不修改记录
    pub fn apply_update(
        &mut self,
        update: UpdateQuizSubmissionRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        if let Some(status) = update.status {
            self.status.ensure_transition(status)?;
        }

        if let Some(answers) = update.answers {
            self.answers = answers;
        }
        if let Some(total_points) = update.total_points {
            self.total_points = Some(total_points);
        }
        if let Some(time_spent) = update.time_spent {
            self.time_spent = Some(time_spent);
        }
        if update.status == Some(SubmissionStatus::Graded) {
            // 评分整体覆盖，未给出的字段清空
            self.score = update.score;
            self.percentage = update.percentage;
            self.passed = update.passed;
            self.feedback = update.feedback;
        } else {
            if let Some(score) = update.score {
                self.score = Some(score);
            }
            if let Some(percentage) = update.percentage {
                self.percentage = Some(percentage);
            }
            if let Some(passed) = update.passed {
                self.passed = Some(passed);
            }
            if let Some(feedback) = update.feedback {
                self.feedback = Some(feedback);
            }
        }
        if let Some(status) = update.status {
            self.status = status;
            if status != SubmissionStatus::InProgress && self.submitted_at.is_none() {
                self.submitted_at = Some(now);
            }
            if status == SubmissionStatus::Graded {
                self.graded_at = Some(update.graded_at.unwrap_or(now));
            }
        }
        if let Some(submitted_at) = update.submitted_at {
            self.submitted_at = Some(submitted_at);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> QuizSubmission {
        QuizSubmission::from_request(
            1,
            CreateQuizSubmissionRequest {
                quiz_id: 2,
                student_id: 3,
                answers: None,
                status: None,
                attempt_number: None,
            },
            chrono::Utc::now(),
        )
    }

    #[test]
    fn test_submission_defaults() {
        let s = started();
        assert_eq!(s.status, SubmissionStatus::InProgress);
        assert!(s.answers.is_empty());
        assert_eq!(s.attempt_number, 1);
        assert!(s.submitted_at.is_none());
        assert!(s.score.is_none());
    }

    #[test]
    fn test_grading_sets_timestamps() {
        let mut s = started();
        s.apply_update(
            UpdateQuizSubmissionRequest {
                score: Some(8.0),
                total_points: Some(10.0),
                percentage: Some(80),
                passed: Some(true),
                status: Some(SubmissionStatus::Graded),
                ..Default::default()
            },
            chrono::Utc::now(),
        )
        .unwrap();
        assert!(s.submitted_at.is_some());
        assert!(s.graded_at.is_some());
        assert_eq!(s.percentage, Some(80));
    }

    #[test]
    fn test_regression_leaves_record_untouched() {
        let mut s = started();
        s.apply_update(
            UpdateQuizSubmissionRequest {
                status: Some(SubmissionStatus::Graded),
                ..Default::default()
            },
            chrono::Utc::now(),
        )
        .unwrap();
        let before = s.clone();
        let result = s.apply_update(
            UpdateQuizSubmissionRequest {
                status: Some(SubmissionStatus::Submitted),
                feedback: Some("redo".to_string()),
                ..Default::default()
            },
            chrono::Utc::now(),
        );
        assert!(result.is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn test_regrade_clears_previous_feedback() {
        let mut s = started();
        s.apply_update(
            UpdateQuizSubmissionRequest {
                score: Some(3.0),
                total_points: Some(10.0),
                percentage: Some(30),
                passed: Some(false),
                feedback: Some("Needs structure".to_string()),
                status: Some(SubmissionStatus::Graded),
                ..Default::default()
            },
            chrono::Utc::now(),
        )
        .unwrap();

        s.apply_update(
            UpdateQuizSubmissionRequest {
                score: Some(9.0),
                percentage: Some(90),
                passed: Some(true),
                status: Some(SubmissionStatus::Graded),
                ..Default::default()
            },
            chrono::Utc::now(),
        )
        .unwrap();
        assert_eq!(s.score, Some(9.0));
        assert_eq!(s.total_points, Some(10.0));
        assert_eq!(s.passed, Some(true));
        assert_eq!(s.feedback, None);
    }
}
