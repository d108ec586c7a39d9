use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::PublicQuizSubmission;
use crate::models::questions::entities::QuestionType;
use crate::models::quizzes::entities::PublicPermission;

// 公开访问时的题目；仅 view 权限返回答案与解析
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/public_quiz.ts")]
pub struct PublicQuestion {
    pub id: i64,
    pub question_type: QuestionType,
    pub question_text: String,
    pub options: Vec<String>,
    pub points: i32,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/public_quiz.ts")]
pub struct PublicQuizView {
    pub quiz_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub time_limit: Option<i32>,
    pub passing_score: i32,
    pub permission: PublicPermission,
    pub required_fields: Vec<String>,
    pub questions: Vec<PublicQuestion>,
}

// 公开提交结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/public_quiz.ts")]
pub struct PublicQuizResult {
    pub score: f64,
    pub total_points: f64,
    pub percentage: i32,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/public_quiz.ts")]
pub struct PublicSubmissionListResponse {
    pub items: Vec<PublicQuizSubmission>,
}
