use serde::Deserialize;
use ts_rs::TS;

use super::entities::{Difficulty, QuestionType};

// 创建题目请求；instructor_id 由服务层填充
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct CreateQuestionRequest {
    #[serde(default)]
    pub instructor_id: i64,
    pub course_id: Option<i64>,
    pub question_type: QuestionType,
    pub question_text: String,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
    pub points: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub explanation: Option<String>,
    pub tags: Option<Vec<String>>,
    pub ai_generated: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct UpdateQuestionRequest {
    pub course_id: Option<i64>,
    pub question_type: Option<QuestionType>,
    pub question_text: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
    pub points: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub explanation: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionListQuery {
    pub instructor_id: Option<i64>,
    pub course_id: Option<i64>,
}
