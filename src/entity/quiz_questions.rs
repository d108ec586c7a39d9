//! 测验-题目关联实体

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use crate::models::quizzes::entities::QuizQuestion;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub quiz_id: i64,
    pub question_id: i64,
    pub order_index: i32,
    pub points: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quizzes::Entity",
        from = "Column::QuizId",
        to = "super::quizzes::Column::Id"
    )]
    Quiz,
    #[sea_orm(
        belongs_to = "super::questions::Entity",
        from = "Column::QuestionId",
        to = "super::questions::Column::Id"
    )]
    Question,
}

impl Related<super::quizzes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quiz.def()
    }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_quiz_question(self) -> QuizQuestion {
        QuizQuestion {
            id: self.id,
            quiz_id: self.quiz_id,
            question_id: self.question_id,
            order_index: self.order_index,
            points: self.points,
        }
    }
}

impl ActiveModel {
    pub fn from_quiz_question(link: &QuizQuestion) -> Self {
        Self {
            id: Set(link.id),
            quiz_id: Set(link.quiz_id),
            question_id: Set(link.question_id),
            order_index: Set(link.order_index),
            points: Set(link.points),
        }
    }
}
