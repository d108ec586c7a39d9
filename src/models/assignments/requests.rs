use serde::Deserialize;
use ts_rs::TS;

use super::entities::RubricCriterion;
use crate::models::quizzes::entities::PublishStatus;

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub max_score: Option<f64>,
    pub rubric: Option<Vec<RubricCriterion>>,
    pub allow_late_submission: Option<bool>,
    pub ai_grading_enabled: Option<bool>,
    pub status: Option<PublishStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub max_score: Option<f64>,
    pub rubric: Option<Vec<RubricCriterion>>,
    pub allow_late_submission: Option<bool>,
    pub ai_grading_enabled: Option<bool>,
    pub status: Option<PublishStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListQuery {
    pub course_id: Option<i64>,
}
