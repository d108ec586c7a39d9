//! 作业提交实体

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{from_json_text, from_json_text_opt, to_datetime, to_json_text, to_json_text_opt};
use crate::models::assignment_submissions::entities::AssignmentSubmission;
use crate::models::common::SubmissionStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignment_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    // JSON 数组
    #[sea_orm(column_type = "Text")]
    pub file_urls: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub score: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    // JSON: [{criterion, score, feedback}]
    #[sea_orm(column_type = "Text", nullable)]
    pub rubric_scores: Option<String>,
    pub status: String,
    pub ai_detection_score: Option<i32>,
    pub ai_graded: bool,
    pub submitted_at: Option<i64>,
    pub graded_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment_submission(self) -> AssignmentSubmission {
        AssignmentSubmission {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            content: self.content,
            file_urls: from_json_text(&self.file_urls),
            score: self.score,
            feedback: self.feedback,
            rubric_scores: from_json_text_opt(self.rubric_scores),
            status: self.status.parse().unwrap_or(SubmissionStatus::Submitted),
            ai_detection_score: self.ai_detection_score,
            ai_graded: self.ai_graded,
            submitted_at: self.submitted_at.map(to_datetime),
            graded_at: self.graded_at.map(to_datetime),
        }
    }
}

impl ActiveModel {
    pub fn from_assignment_submission(
        submission: &AssignmentSubmission,
    ) -> crate::errors::Result<Self> {
        Ok(Self {
            id: Set(submission.id),
            assignment_id: Set(submission.assignment_id),
            student_id: Set(submission.student_id),
            content: Set(submission.content.clone()),
            file_urls: Set(to_json_text(&submission.file_urls)?),
            score: Set(submission.score),
            feedback: Set(submission.feedback.clone()),
            rubric_scores: Set(to_json_text_opt(submission.rubric_scores.as_ref())?),
            status: Set(submission.status.to_string()),
            ai_detection_score: Set(submission.ai_detection_score),
            ai_graded: Set(submission.ai_graded),
            submitted_at: Set(submission.submitted_at.map(|d| d.timestamp())),
            graded_at: Set(submission.graded_at.map(|d| d.timestamp())),
        })
    }
}
