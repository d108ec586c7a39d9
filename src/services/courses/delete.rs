use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::ApiResponse;
use crate::services::common::{ApiError, current_user, load_managed_course};

pub async fn delete_course(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    load_managed_course(storage.as_ref(), &user, course_id).await?;

    storage.delete_course(course_id).await.map_err(ApiError::from)?;
    info!("Course {} deleted by user {}", course_id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Course deleted successfully")))
}
