use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ai::entities::AiProvider;

// AI 设置响应（不返回密钥本身）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct AiSettingsResponse {
    pub active_provider: AiProvider,
    // 用户自己配置了密钥的提供方
    pub configured_providers: Vec<AiProvider>,
    // 平台提供默认密钥的提供方
    pub platform_providers: Vec<AiProvider>,
}
