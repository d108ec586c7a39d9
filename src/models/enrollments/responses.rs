use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::Enrollment;
use crate::models::users::entities::User;

// 选课记录附带学生信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentWithStudent {
    #[serde(flatten)]
    #[ts(flatten)]
    pub enrollment: Enrollment,
    pub student: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListResponse {
    pub items: Vec<EnrollmentWithStudent>,
}
