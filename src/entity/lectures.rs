//! 讲义实体

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::lectures::entities::Lecture;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lectures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub order_index: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_lecture(self) -> Lecture {
        Lecture {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            content: self.content,
            file_url: self.file_url,
            order_index: self.order_index,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}

impl ActiveModel {
    pub fn from_lecture(lecture: &Lecture) -> Self {
        Self {
            id: Set(lecture.id),
            course_id: Set(lecture.course_id),
            title: Set(lecture.title.clone()),
            description: Set(lecture.description.clone()),
            content: Set(lecture.content.clone()),
            file_url: Set(lecture.file_url.clone()),
            order_index: Set(lecture.order_index),
            created_at: Set(lecture.created_at.timestamp()),
            updated_at: Set(lecture.updated_at.timestamp()),
        }
    }
}
