use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::Lecture;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/lecture.ts")]
pub struct LectureListResponse {
    pub items: Vec<Lecture>,
}
