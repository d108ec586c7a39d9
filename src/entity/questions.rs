//! 题库实体

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{from_json_text, to_datetime, to_json_text};
use crate::models::questions::entities::{Difficulty, Question, QuestionType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub instructor_id: i64,
    pub course_id: Option<i64>,
    pub question_type: String,
    #[sea_orm(column_type = "Text")]
    pub question_text: String,
    // JSON 数组
    #[sea_orm(column_type = "Text")]
    pub options: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub correct_answer: Option<String>,
    pub points: i32,
    pub difficulty: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub explanation: Option<String>,
    // JSON 数组
    #[sea_orm(column_type = "Text")]
    pub tags: String,
    pub ai_generated: bool,
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
    pub fn into_question(self) -> Question {
        Question {
            id: self.id,
            instructor_id: self.instructor_id,
            course_id: self.course_id,
            question_type: self
                .question_type
                .parse()
                .unwrap_or(QuestionType::ShortAnswer),
            question_text: self.question_text,
            options: from_json_text(&self.options),
            correct_answer: self.correct_answer,
            points: self.points,
            difficulty: self.difficulty.parse().unwrap_or(Difficulty::Medium),
            explanation: self.explanation,
            tags: from_json_text(&self.tags),
            ai_generated: self.ai_generated,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}

impl ActiveModel {
    pub fn from_question(question: &Question) -> crate::errors::Result<Self> {
        Ok(Self {
            id: Set(question.id),
            instructor_id: Set(question.instructor_id),
            course_id: Set(question.course_id),
            question_type: Set(question.question_type.to_string()),
            question_text: Set(question.question_text.clone()),
            options: Set(to_json_text(&question.options)?),
            correct_answer: Set(question.correct_answer.clone()),
            points: Set(question.points),
            difficulty: Set(question.difficulty.to_string()),
            explanation: Set(question.explanation.clone()),
            tags: Set(to_json_text(&question.tags)?),
            ai_generated: Set(question.ai_generated),
            created_at: Set(question.created_at.timestamp()),
            updated_at: Set(question.updated_at.timestamp()),
        })
    }
}
