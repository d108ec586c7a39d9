use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::requests::{CreateCourseRequest, UpdateCourseRequest};

// 课程实体，归属唯一的授课教师
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    // 课程代码，例如 "CS101"
    pub code: Option<String>,
    pub instructor_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Course {
    pub fn from_request(
        id: i64,
        req: CreateCourseRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            id,
            title: req.title,
            description: req.description,
            code: req.code,
            instructor_id: req.instructor_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateCourseRequest, now: chrono::DateTime<chrono::Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(code) = update.code {
            self.code = Some(code);
        }
        if let Some(instructor_id) = update.instructor_id {
            self.instructor_id = instructor_id;
        }
        self.updated_at = now;
    }
}
