use serde::Deserialize;
use ts_rs::TS;

use crate::models::questions::entities::{Difficulty, QuestionType};

// AI 出题请求
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct GenerateQuestionsRequest {
    pub topic: String,
    #[serde(default = "default_count")]
    pub count: u32,
    pub question_type: QuestionType,
    pub difficulty: Option<Difficulty>,
    pub course_id: Option<i64>,
    // 额外的出题要求（例如参考材料）
    pub context: Option<String>,
}

fn default_count() -> u32 {
    5
}

// 聊天助手请求
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/ai.ts")]
pub struct ChatRequest {
    pub message: String,
}
