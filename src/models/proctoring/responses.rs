use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::ProctoringViolation;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/proctoring.ts")]
pub struct ViolationListResponse {
    pub items: Vec<ProctoringViolation>,
}
