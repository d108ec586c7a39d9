use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/lecture.ts")]
pub struct CreateLectureRequest {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/lecture.ts")]
pub struct UpdateLectureRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/lecture.ts")]
pub struct LectureListQuery {
    pub course_id: Option<i64>,
}
