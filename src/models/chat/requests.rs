use serde::Deserialize;
use ts_rs::TS;

use crate::models::ai::entities::AiProvider;

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct CreateChatCommandRequest {
    pub user_id: i64,
    pub command: String,
    pub response: Option<String>,
    pub provider: Option<AiProvider>,
}
