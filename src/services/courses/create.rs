use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, ApiResult, current_user};
use crate::storage::Storage;

pub async fn create_course(
    service: &CourseService,
    mut course: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    if course.title.trim().is_empty() {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "Course title is required").into());
    }
    course.instructor_id = resolve_instructor(storage.as_ref(), &user, course.instructor_id).await?;

    let created = storage.create_course(course).await.map_err(ApiError::from)?;
    info!("Course {} created by user {}", created.id, user.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created, "Course created successfully")))
}

/// 教师只能为自己建课；管理员可指定授课教师
async fn resolve_instructor(storage: &dyn Storage, user: &User, requested: i64) -> ApiResult<i64> {
    if user.role != UserRole::Admin || requested == 0 || requested == user.id {
        return Ok(user.id);
    }
    match storage.get_user_by_id(requested).await? {
        Some(instructor) if instructor.role.is_staff() => Ok(instructor.id),
        Some(_) => Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Course instructor must be an instructor or admin",
        )),
        None => Err(ApiError::not_found(ErrorCode::UserNotFound, "Instructor not found")),
    }
}
