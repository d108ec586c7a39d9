//! 作业实体

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{from_json_text_opt, to_datetime, to_json_text_opt};
use crate::models::assignments::entities::Assignment;
use crate::models::quizzes::entities::PublishStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub instructions: Option<String>,
    pub due_date: Option<i64>,
    #[sea_orm(column_type = "Double")]
    pub max_score: f64,
    // JSON: [{criterion, maxPoints, description}]
    #[sea_orm(column_type = "Text", nullable)]
    pub rubric: Option<String>,
    pub allow_late_submission: bool,
    pub ai_grading_enabled: bool,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment(self) -> Assignment {
        Assignment {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            instructions: self.instructions,
            due_date: self.due_date.map(to_datetime),
            max_score: self.max_score,
            rubric: from_json_text_opt(self.rubric),
            allow_late_submission: self.allow_late_submission,
            ai_grading_enabled: self.ai_grading_enabled,
            status: self.status.parse().unwrap_or(PublishStatus::Draft),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}

impl ActiveModel {
    pub fn from_assignment(assignment: &Assignment) -> crate::errors::Result<Self> {
        Ok(Self {
            id: Set(assignment.id),
            course_id: Set(assignment.course_id),
            title: Set(assignment.title.clone()),
            description: Set(assignment.description.clone()),
            instructions: Set(assignment.instructions.clone()),
            due_date: Set(assignment.due_date.map(|d| d.timestamp())),
            max_score: Set(assignment.max_score),
            rubric: Set(to_json_text_opt(assignment.rubric.as_ref())?),
            allow_late_submission: Set(assignment.allow_late_submission),
            ai_grading_enabled: Set(assignment.ai_grading_enabled),
            status: Set(assignment.status.to_string()),
            created_at: Set(assignment.created_at.timestamp()),
            updated_at: Set(assignment.updated_at.timestamp()),
        })
    }
}
