use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::QuizSubmission;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct QuizSubmissionListResponse {
    pub items: Vec<QuizSubmission>,
}
