use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::requests::CreateChatCommandRequest;
use crate::models::ai::entities::AiProvider;

// 聊天助手的一次问答记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct ChatCommand {
    pub id: i64,
    pub user_id: i64,
    pub command: String,
    pub response: Option<String>,
    pub provider: Option<AiProvider>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ChatCommand {
    pub fn from_request(
        id: i64,
        req: CreateChatCommandRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            id,
            user_id: req.user_id,
            command: req.command,
            response: req.response,
            provider: req.provider,
            created_at: now,
        }
    }
}
