use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::requests::CreateEnrollmentRequest;

// 选课记录（学生与课程的多对多关联）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

impl Enrollment {
    pub fn from_request(
        id: i64,
        req: CreateEnrollmentRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            id,
            course_id: req.course_id,
            student_id: req.student_id,
            enrolled_at: now,
        }
    }
}
