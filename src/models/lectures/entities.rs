use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::requests::{CreateLectureRequest, UpdateLectureRequest};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/lecture.ts")]
pub struct Lecture {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    // 讲义正文（Markdown）
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub order_index: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Lecture {
    pub fn from_request(
        id: i64,
        req: CreateLectureRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            id,
            course_id: req.course_id,
            title: req.title,
            description: req.description,
            content: req.content,
            file_url: req.file_url,
            order_index: req.order_index.unwrap_or(0),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateLectureRequest, now: chrono::DateTime<chrono::Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(content) = update.content {
            self.content = Some(content);
        }
        if let Some(file_url) = update.file_url {
            self.file_url = Some(file_url);
        }
        if let Some(order_index) = update.order_index {
            self.order_index = order_index;
        }
        self.updated_at = now;
    }
}
