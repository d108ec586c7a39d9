//! 选课实体

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::enrollments::entities::Enrollment;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub enrolled_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_enrollment(self) -> Enrollment {
        Enrollment {
            id: self.id,
            course_id: self.course_id,
            student_id: self.student_id,
            enrolled_at: to_datetime(self.enrolled_at),
        }
    }
}

impl ActiveModel {
    pub fn from_enrollment(enrollment: &Enrollment) -> Self {
        Self {
            id: Set(enrollment.id),
            course_id: Set(enrollment.course_id),
            student_id: Set(enrollment.student_id),
            enrolled_at: Set(enrollment.enrolled_at.timestamp()),
        }
    }
}
