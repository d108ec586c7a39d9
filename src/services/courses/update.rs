use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::courses::requests::UpdateCourseRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user, load_managed_course};

pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    mut update: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    load_managed_course(storage.as_ref(), &user, course_id).await?;

    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "Course title cannot be empty").into());
    }
    // 只有管理员可以转交课程
    if user.role != UserRole::Admin {
        update.instructor_id = None;
    }

    let course = storage
        .update_course(course_id, update)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(ErrorCode::CourseNotFound, "Course not found"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Course updated successfully")))
}
