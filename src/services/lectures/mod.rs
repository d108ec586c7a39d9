//! 讲义：课程管理者维护，选课学生可读

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::common::{
    ApiError, ApiResult, app_storage, current_user, load_managed_course, load_visible_course,
};
use crate::models::lectures::{
    entities::Lecture,
    requests::{CreateLectureRequest, LectureListQuery, UpdateLectureRequest},
    responses::LectureListResponse,
};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct LectureService {
    storage: Option<Arc<dyn Storage>>,
}

impl LectureService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_storage(request),
        }
    }

    pub async fn list_lectures(
        &self,
        query: LectureListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;

        match query.course_id {
            Some(course_id) => {
                load_visible_course(storage.as_ref(), &user, course_id).await?;
            }
            None if user.role == UserRole::Admin => {}
            None => {
                return Err(ApiError::bad_request(
                    ErrorCode::BadRequest,
                    "courseId is required",
                )
                .into());
            }
        }

        let mut items = storage.list_lectures(query).await.map_err(ApiError::from)?;
        items.sort_by_key(|l| (l.course_id, l.order_index, l.id));
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            LectureListResponse { items },
            "Lecture list retrieved successfully",
        )))
    }

    pub async fn create_lecture(
        &self,
        lecture: CreateLectureRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;
        load_managed_course(storage.as_ref(), &user, lecture.course_id).await?;

        if lecture.title.trim().is_empty() {
            return Err(ApiError::bad_request(
                ErrorCode::ValidationFailed,
                "Lecture title is required",
            )
            .into());
        }

        let created = storage.create_lecture(lecture).await.map_err(ApiError::from)?;
        info!("Lecture {} created in course {}", created.id, created.course_id);
        Ok(HttpResponse::Created().json(ApiResponse::success(
            created,
            "Lecture created successfully",
        )))
    }

    pub async fn get_lecture(&self, lecture_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;

        let lecture = load_lecture(storage.as_ref(), lecture_id).await?;
        load_visible_course(storage.as_ref(), &user, lecture.course_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            lecture,
            "Lecture retrieved successfully",
        )))
    }

    pub async fn update_lecture(
        &self,
        lecture_id: i64,
        update: UpdateLectureRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;
        managed_lecture(storage.as_ref(), &user, lecture_id).await?;

        let lecture = storage
            .update_lecture(lecture_id, update)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::not_found(ErrorCode::LectureNotFound, "Lecture not found"))?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            lecture,
            "Lecture updated successfully",
        )))
    }

    pub async fn delete_lecture(
        &self,
        lecture_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;
        managed_lecture(storage.as_ref(), &user, lecture_id).await?;

        storage.delete_lecture(lecture_id).await.map_err(ApiError::from)?;
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Lecture deleted successfully")))
    }
}

async fn load_lecture(storage: &dyn Storage, lecture_id: i64) -> ApiResult<Lecture> {
    storage
        .get_lecture_by_id(lecture_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::LectureNotFound, "Lecture not found"))
}

async fn managed_lecture(storage: &dyn Storage, user: &User, lecture_id: i64) -> ApiResult<Lecture> {
    let lecture = load_lecture(storage, lecture_id).await?;
    load_managed_course(storage, user, lecture.course_id).await?;
    Ok(lecture)
}
