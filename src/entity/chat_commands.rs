//! 聊天记录实体

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::chat::entities::ChatCommand;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "chat_commands")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    #[sea_orm(column_type = "Text")]
    pub command: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub response: Option<String>,
    pub provider: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_chat_command(self) -> ChatCommand {
        ChatCommand {
            id: self.id,
            user_id: self.user_id,
            command: self.command,
            response: self.response,
            provider: self.provider.and_then(|p| p.parse().ok()),
            created_at: to_datetime(self.created_at),
        }
    }
}

impl ActiveModel {
    pub fn from_chat_command(command: &ChatCommand) -> Self {
        Self {
            id: Set(command.id),
            user_id: Set(command.user_id),
            command: Set(command.command.clone()),
            response: Set(command.response.clone()),
            provider: Set(command.provider.map(|p| p.to_string())),
            created_at: Set(command.created_at.timestamp()),
        }
    }
}
