use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::requests::{CreateViolationRequest, UpdateViolationRequest};
use crate::models::define_string_enum;

define_string_enum! {
    // 监考违规类型
    ViolationType, "违规类型", "../frontend/src/types/generated/proctoring.ts" {
        TabSwitch => "tab_switch",
        WindowBlur => "window_blur",
        NoFace => "no_face",
        MultipleFaces => "multiple_faces",
        CopyPaste => "copy_paste",
        FullscreenExit => "fullscreen_exit",
        Other => "other",
    }
}

define_string_enum! {
    ViolationSeverity, "严重程度", "../frontend/src/types/generated/proctoring.ts" {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

// 监考违规记录，只增不删
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/proctoring.ts")]
pub struct ProctoringViolation {
    pub id: i64,
    pub submission_id: i64,
    pub violation_type: ViolationType,
    pub severity: ViolationSeverity,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub reviewed: bool,
    pub occurred_at: chrono::DateTime<chrono::Utc>,
}

impl ProctoringViolation {
    pub fn from_request(
        id: i64,
        req: CreateViolationRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            id,
            submission_id: req.submission_id,
            violation_type: req.violation_type,
            severity: req.severity.unwrap_or(ViolationSeverity::Medium),
            description: req.description,
            metadata: req.metadata,
            reviewed: false,
            occurred_at: req.occurred_at.unwrap_or(now),
        }
    }

    pub fn apply_update(&mut self, update: UpdateViolationRequest) {
        if let Some(reviewed) = update.reviewed {
            self.reviewed = reviewed;
        }
        if let Some(severity) = update.severity {
            self.severity = severity;
        }
    }
}
