//! 课程实体

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::courses::entities::Course;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub code: Option<String>,
    pub instructor_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::InstructorId",
        to = "super::users::Column::Id"
    )]
    Instructor,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instructor.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_course(self) -> Course {
        Course {
            id: self.id,
            title: self.title,
            description: self.description,
            code: self.code,
            instructor_id: self.instructor_id,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}

impl ActiveModel {
    pub fn from_course(course: &Course) -> Self {
        Self {
            id: Set(course.id),
            title: Set(course.title.clone()),
            description: Set(course.description.clone()),
            code: Set(course.code.clone()),
            instructor_id: Set(course.instructor_id),
            created_at: Set(course.created_at.timestamp()),
            updated_at: Set(course.updated_at.timestamp()),
        }
    }
}
