use serde::Deserialize;
use ts_rs::TS;

use super::entities::{PublicPermission, PublishStatus};

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct CreateQuizRequest {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub time_limit: Option<i32>,
    pub passing_score: Option<i32>,
    pub randomize_questions: Option<bool>,
    pub randomize_options: Option<bool>,
    pub show_results: Option<bool>,
    pub proctored: Option<bool>,
    pub status: Option<PublishStatus>,
    pub max_attempts: Option<i32>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub public_required_fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct UpdateQuizRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_limit: Option<i32>,
    pub passing_score: Option<i32>,
    pub randomize_questions: Option<bool>,
    pub randomize_options: Option<bool>,
    pub show_results: Option<bool>,
    pub proctored: Option<bool>,
    pub status: Option<PublishStatus>,
    pub max_attempts: Option<i32>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub public_required_fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizListQuery {
    pub course_id: Option<i64>,
}

// 向测验添加题目；缺省 order_index 时追加到末尾
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct CreateQuizQuestionRequest {
    pub question_id: i64,
    pub order_index: Option<i32>,
    pub points: Option<i32>,
}

// 生成公开链接
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct GeneratePublicLinkRequest {
    pub permission: PublicPermission,
    pub required_fields: Option<Vec<String>>,
}
