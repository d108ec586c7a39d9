//! 用户实体

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::{from_json_text, to_datetime, to_json_text};
use crate::models::users::entities::{User, UserRole};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub active_ai_provider: String,
    // JSON: {provider: key}
    #[sea_orm(column_type = "Text")]
    pub ai_api_keys: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::courses::Entity")]
    Courses,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role.parse::<UserRole>().unwrap_or(UserRole::Student),
            name: self.name,
            avatar_url: self.avatar_url,
            active_ai_provider: self.active_ai_provider.parse().unwrap_or_default(),
            ai_api_keys: from_json_text(&self.ai_api_keys),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}

impl ActiveModel {
    pub fn from_user(user: &User) -> crate::errors::Result<Self> {
        Ok(Self {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.to_string()),
            name: Set(user.name.clone()),
            avatar_url: Set(user.avatar_url.clone()),
            active_ai_provider: Set(user.active_ai_provider.to_string()),
            ai_api_keys: Set(to_json_text(&user.ai_api_keys)?),
            created_at: Set(user.created_at.timestamp()),
            updated_at: Set(user.updated_at.timestamp()),
        })
    }
}
