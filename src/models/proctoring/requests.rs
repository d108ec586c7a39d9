use serde::Deserialize;
use ts_rs::TS;

use super::entities::{ViolationSeverity, ViolationType};

// submission_id 由路由路径填充
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/proctoring.ts")]
pub struct CreateViolationRequest {
    #[serde(default)]
    pub submission_id: i64,
    pub violation_type: ViolationType,
    pub severity: Option<ViolationSeverity>,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub occurred_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/proctoring.ts")]
pub struct UpdateViolationRequest {
    pub reviewed: Option<bool>,
    pub severity: Option<ViolationSeverity>,
}
