use serde::Deserialize;
use ts_rs::TS;

use super::entities::SubmittedAnswer;
use crate::models::common::SubmissionStatus;

// 存储层创建载荷
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct CreateQuizSubmissionRequest {
    pub quiz_id: i64,
    pub student_id: i64,
    pub answers: Option<Vec<SubmittedAnswer>>,
    pub status: Option<SubmissionStatus>,
    pub attempt_number: Option<i32>,
}

// 存储层更新载荷；评分字段需一次性写入
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct UpdateQuizSubmissionRequest {
    pub answers: Option<Vec<SubmittedAnswer>>,
    pub score: Option<f64>,
    pub total_points: Option<f64>,
    pub percentage: Option<i32>,
    pub passed: Option<bool>,
    pub status: Option<SubmissionStatus>,
    pub time_spent: Option<i32>,
    pub feedback: Option<String>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct QuizSubmissionListQuery {
    pub quiz_id: Option<i64>,
    pub student_id: Option<i64>,
}

// 学生交卷
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct SubmitQuizRequest {
    pub answers: Vec<SubmittedAnswer>,
    pub time_spent: Option<i32>,
}

// 教师人工评分
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct GradeQuizSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}
