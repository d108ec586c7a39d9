//! 测验提交实体

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{from_json_text, to_datetime, to_json_text};
use crate::models::common::SubmissionStatus;
use crate::models::quiz_submissions::entities::QuizSubmission;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub quiz_id: i64,
    pub student_id: i64,
    // JSON: [{questionId, answer}]
    #[sea_orm(column_type = "Text")]
    pub answers: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub score: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub total_points: Option<f64>,
    pub percentage: Option<i32>,
    pub passed: Option<bool>,
    pub status: String,
    pub attempt_number: i32,
    pub time_spent: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub started_at: i64,
    pub submitted_at: Option<i64>,
    pub graded_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_quiz_submission(self) -> QuizSubmission {
        QuizSubmission {
            id: self.id,
            quiz_id: self.quiz_id,
            student_id: self.student_id,
            answers: from_json_text(&self.answers),
            score: self.score,
            total_points: self.total_points,
            percentage: self.percentage,
            passed: self.passed,
            status: self.status.parse().unwrap_or(SubmissionStatus::InProgress),
            attempt_number: self.attempt_number,
            time_spent: self.time_spent,
            feedback: self.feedback,
            started_at: to_datetime(self.started_at),
            submitted_at: self.submitted_at.map(to_datetime),
            graded_at: self.graded_at.map(to_datetime),
        }
    }
}

impl ActiveModel {
    pub fn from_quiz_submission(submission: &QuizSubmission) -> crate::errors::Result<Self> {
        Ok(Self {
            id: Set(submission.id),
            quiz_id: Set(submission.quiz_id),
            student_id: Set(submission.student_id),
            answers: Set(to_json_text(&submission.answers)?),
            score: Set(submission.score),
            total_points: Set(submission.total_points),
            percentage: Set(submission.percentage),
            passed: Set(submission.passed),
            status: Set(submission.status.to_string()),
            attempt_number: Set(submission.attempt_number),
            time_spent: Set(submission.time_spent),
            feedback: Set(submission.feedback.clone()),
            started_at: Set(submission.started_at.timestamp()),
            submitted_at: Set(submission.submitted_at.map(|d| d.timestamp())),
            graded_at: Set(submission.graded_at.map(|d| d.timestamp())),
        })
    }
}
