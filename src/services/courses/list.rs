use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::courses::{
    entities::Course, requests::CourseListQuery, responses::CourseListResponse,
};
use crate::models::enrollments::requests::EnrollmentListQuery;
use crate::models::users::entities::{User, UserRole};
use crate::models::ApiResponse;
use crate::services::common::{ApiError, ApiResult, current_user};
use crate::storage::Storage;

pub async fn list_courses(
    service: &CourseService,
    query: CourseListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let mut items = visible_courses(storage.as_ref(), &user, query).await?;
    items.sort_by_key(|c| c.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CourseListResponse { items },
        "Course list retrieved successfully",
    )))
}

/// 管理员看全部（可按教师筛选），教师看自己的课程，学生看已选课程
async fn visible_courses(
    storage: &dyn Storage,
    user: &User,
    query: CourseListQuery,
) -> ApiResult<Vec<Course>> {
    match user.role {
        UserRole::Admin => Ok(storage.list_courses(query).await?),
        UserRole::Instructor => Ok(storage
            .list_courses(CourseListQuery {
                instructor_id: Some(user.id),
            })
            .await?),
        UserRole::Student => {
            let enrollments = storage
                .list_enrollments(EnrollmentListQuery {
                    course_id: None,
                    student_id: Some(user.id),
                })
                .await?;
            let mut courses = Vec::with_capacity(enrollments.len());
            for enrollment in enrollments {
                if let Some(course) = storage
                    .get_course_by_id(enrollment.course_id)
                    .await
                    .map_err(ApiError::from)?
                {
                    courses.push(course);
                }
            }
            Ok(courses)
        }
    }
}
