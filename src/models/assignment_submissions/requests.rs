use serde::Deserialize;
use ts_rs::TS;

use super::entities::RubricScore;
use crate::models::common::SubmissionStatus;

// 存储层创建载荷
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment_submission.ts")]
pub struct CreateAssignmentSubmissionRequest {
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub file_urls: Option<Vec<String>>,
    pub status: Option<SubmissionStatus>,
}

// 存储层更新载荷
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment_submission.ts")]
pub struct UpdateAssignmentSubmissionRequest {
    pub content: Option<String>,
    pub file_urls: Option<Vec<String>>,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub rubric_scores: Option<Vec<RubricScore>>,
    pub status: Option<SubmissionStatus>,
    pub ai_detection_score: Option<i32>,
    pub ai_graded: Option<bool>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment_submission.ts")]
pub struct AssignmentSubmissionListQuery {
    pub assignment_id: Option<i64>,
    pub student_id: Option<i64>,
}

// 学生提交作业
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment_submission.ts")]
pub struct SubmitAssignmentRequest {
    pub content: Option<String>,
    #[serde(default)]
    pub file_urls: Vec<String>,
}

// 教师人工评分
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment_submission.ts")]
pub struct GradeAssignmentRequest {
    pub score: f64,
    pub feedback: Option<String>,
    pub rubric_scores: Option<Vec<RubricScore>>,
}
