use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::questions::entities::Question;

// AI 出题结果
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct GenerateQuestionsResponse {
    pub items: Vec<Question>,
}

// AI 内容检测结果
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct AiDetectionResponse {
    pub submission_id: i64,
    // 0-100，越高越可能由 AI 生成
    pub ai_detection_score: i32,
    pub reasoning: Option<String>,
}
