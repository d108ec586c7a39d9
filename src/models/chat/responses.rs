use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::ChatCommand;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/chat.ts")]
pub struct ChatHistoryResponse {
    pub items: Vec<ChatCommand>,
}
