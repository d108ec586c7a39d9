//! 测验实体

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{from_json_text, to_datetime, to_json_text};
use crate::models::quizzes::entities::{PublishStatus, Quiz};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quizzes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub time_limit: Option<i32>,
    pub passing_score: i32,
    pub randomize_questions: bool,
    pub randomize_options: bool,
    pub show_results: bool,
    pub proctored: bool,
    pub status: String,
    pub max_attempts: i32,
    pub due_date: Option<i64>,
    #[sea_orm(unique)]
    pub public_token: Option<String>,
    pub public_permission: Option<String>,
    pub public_enabled: bool,
    // JSON 数组
    #[sea_orm(column_type = "Text")]
    pub public_required_fields: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quiz_questions::Entity")]
    QuizQuestions,
}

impl Related<super::quiz_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizQuestions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_quiz(self) -> Quiz {
        Quiz {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            time_limit: self.time_limit,
            passing_score: self.passing_score,
            randomize_questions: self.randomize_questions,
            randomize_options: self.randomize_options,
            show_results: self.show_results,
            proctored: self.proctored,
            status: self.status.parse().unwrap_or(PublishStatus::Draft),
            max_attempts: self.max_attempts,
            due_date: self.due_date.map(to_datetime),
            public_token: self.public_token,
            // 无法识别的权限按未授权处理
            public_permission: self.public_permission.and_then(|p| p.parse().ok()),
            public_enabled: self.public_enabled,
            public_required_fields: from_json_text(&self.public_required_fields),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}

impl ActiveModel {
    pub fn from_quiz(quiz: &Quiz) -> crate::errors::Result<Self> {
        Ok(Self {
            id: Set(quiz.id),
            course_id: Set(quiz.course_id),
            title: Set(quiz.title.clone()),
            description: Set(quiz.description.clone()),
            time_limit: Set(quiz.time_limit),
            passing_score: Set(quiz.passing_score),
            randomize_questions: Set(quiz.randomize_questions),
            randomize_options: Set(quiz.randomize_options),
            show_results: Set(quiz.show_results),
            proctored: Set(quiz.proctored),
            status: Set(quiz.status.to_string()),
            max_attempts: Set(quiz.max_attempts),
            due_date: Set(quiz.due_date.map(|d| d.timestamp())),
            public_token: Set(quiz.public_token.clone()),
            public_permission: Set(quiz.public_permission.map(|p| p.to_string())),
            public_enabled: Set(quiz.public_enabled),
            public_required_fields: Set(to_json_text(&quiz.public_required_fields)?),
            created_at: Set(quiz.created_at.timestamp()),
            updated_at: Set(quiz.updated_at.timestamp()),
        })
    }
}
