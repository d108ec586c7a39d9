use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::AssignmentSubmission;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment_submission.ts")]
pub struct AssignmentSubmissionListResponse {
    pub items: Vec<AssignmentSubmission>,
}
