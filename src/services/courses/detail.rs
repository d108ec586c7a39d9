use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::ApiResponse;
use crate::services::common::{current_user, load_visible_course};

pub async fn get_course(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let course = load_visible_course(storage.as_ref(), &user, course_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Course retrieved successfully")))
}
