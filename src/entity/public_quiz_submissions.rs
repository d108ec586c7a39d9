//! 公开测验提交实体

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{from_json_text, to_datetime, to_json_text};
use crate::models::public_quiz::entities::PublicQuizSubmission;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "public_quiz_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub quiz_id: i64,
    // JSON: {field: value}
    #[sea_orm(column_type = "Text")]
    pub identification_data: String,
    #[sea_orm(column_type = "Text")]
    pub answers: String,
    #[sea_orm(column_type = "Double")]
    pub score: f64,
    #[sea_orm(column_type = "Double")]
    pub total_points: f64,
    pub percentage: i32,
    pub passed: bool,
    pub submitted_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_public_submission(self) -> PublicQuizSubmission {
        PublicQuizSubmission {
            id: self.id,
            quiz_id: self.quiz_id,
            identification_data: from_json_text(&self.identification_data),
            answers: from_json_text(&self.answers),
            score: self.score,
            total_points: self.total_points,
            percentage: self.percentage,
            passed: self.passed,
            submitted_at: to_datetime(self.submitted_at),
        }
    }
}

impl ActiveModel {
    pub fn from_public_submission(
        submission: &PublicQuizSubmission,
    ) -> crate::errors::Result<Self> {
        Ok(Self {
            id: Set(submission.id),
            quiz_id: Set(submission.quiz_id),
            identification_data: Set(to_json_text(&submission.identification_data)?),
            answers: Set(to_json_text(&submission.answers)?),
            score: Set(submission.score),
            total_points: Set(submission.total_points),
            percentage: Set(submission.percentage),
            passed: Set(submission.passed),
            submitted_at: Set(submission.submitted_at.timestamp()),
        })
    }
}
