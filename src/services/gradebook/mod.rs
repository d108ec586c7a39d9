//! 课程成绩册
//!
//! - `build`: 汇总每位学生在各测验/作业上的最近一次提交
//! - `export`: 成绩册 CSV 导出

pub mod build;
pub mod export;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::common::{ApiError, ApiResult, app_storage, current_user, load_managed_course};
use crate::models::ApiResponse;
use crate::storage::Storage;

pub struct GradebookService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradebookService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_storage(request),
        }
    }

    pub async fn get(&self, course_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;
        let course = load_managed_course(storage.as_ref(), &user, course_id).await?;

        let gradebook = build::build_gradebook(storage.as_ref(), &course)
            .await
            .map_err(ApiError::from)?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            gradebook,
            "Gradebook retrieved successfully",
        )))
    }

    pub async fn export(&self, course_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;
        let course = load_managed_course(storage.as_ref(), &user, course_id).await?;

        let gradebook = build::build_gradebook(storage.as_ref(), &course)
            .await
            .map_err(ApiError::from)?;
        let data = export::to_csv(&gradebook).map_err(ApiError::from)?;
        info!(
            "Gradebook exported for course {} ({} students)",
            course.id,
            gradebook.students.len()
        );

        Ok(HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"gradebook-{}.csv\"", course.id),
            ))
            .body(data))
    }
}
