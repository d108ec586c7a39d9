//! 选课管理
//!
//! 学生可以为自己选课；课程管理者可以为任意学生选课或退课。
//! 同一学生重复选同一课程返回 409。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::common::{
    ApiError, ApiResult, app_storage, can_manage_course, current_user, is_enrolled, load_course,
    load_managed_course,
};
use crate::models::enrollments::{
    entities::Enrollment,
    requests::{CreateEnrollmentRequest, EnrollmentListQuery},
    responses::{EnrollmentListResponse, EnrollmentWithStudent},
};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_storage(request),
        }
    }

    pub async fn list_enrollments(
        &self,
        mut query: EnrollmentListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;

        match (user.role, query.course_id) {
            // 学生只能看到自己的选课
            (UserRole::Student, _) => query.student_id = Some(user.id),
            (UserRole::Instructor, Some(course_id)) => {
                load_managed_course(storage.as_ref(), &user, course_id).await?;
            }
            (UserRole::Instructor, None) => {
                return Err(ApiError::bad_request(ErrorCode::BadRequest, "courseId is required").into());
            }
            (UserRole::Admin, _) => {}
        }

        let mut enrollments = storage.list_enrollments(query).await.map_err(ApiError::from)?;
        enrollments.sort_by_key(|e| e.id);
        let items = with_students(storage.as_ref(), enrollments).await?;

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            EnrollmentListResponse { items },
            "Enrollment list retrieved successfully",
        )))
    }

    pub async fn create_enrollment(
        &self,
        enrollment: CreateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;

        let created = enroll(storage.as_ref(), &user, enrollment).await?;
        info!(
            "Student {} enrolled in course {}",
            created.student_id, created.course_id
        );
        Ok(HttpResponse::Created().json(ApiResponse::success(
            created,
            "Enrolled successfully",
        )))
    }

    pub async fn delete_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;

        let enrollment = storage
            .get_enrollment_by_id(enrollment_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| {
                ApiError::not_found(ErrorCode::EnrollmentNotFound, "Enrollment not found")
            })?;
        let course = load_course(storage.as_ref(), enrollment.course_id).await?;
        if enrollment.student_id != user.id && !can_manage_course(&user, &course) {
            return Err(ApiError::forbidden(
                ErrorCode::CoursePermissionDenied,
                "You cannot remove this enrollment",
            )
            .into());
        }

        storage.delete_enrollment(enrollment_id).await.map_err(ApiError::from)?;
        info!("Enrollment {} removed by user {}", enrollment_id, user.id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Enrollment removed successfully")))
    }
}

/// 选课：校验权限、学生身份与重复选课
pub(crate) async fn enroll(
    storage: &dyn Storage,
    user: &User,
    req: CreateEnrollmentRequest,
) -> ApiResult<Enrollment> {
    let course = load_course(storage, req.course_id).await?;
    if req.student_id != user.id && !can_manage_course(user, &course) {
        return Err(ApiError::forbidden(
            ErrorCode::CoursePermissionDenied,
            "You can only enroll yourself in this course",
        ));
    }

    let student = storage
        .get_user_by_id(req.student_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound, "Student not found"))?;
    if student.role != UserRole::Student {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Only students can be enrolled in a course",
        ));
    }

    if is_enrolled(storage, req.course_id, req.student_id).await? {
        return Err(ApiError::conflict(
            ErrorCode::AlreadyEnrolled,
            "Student is already enrolled in this course",
        ));
    }
    Ok(storage.create_enrollment(req).await?)
}

async fn with_students(
    storage: &dyn Storage,
    enrollments: Vec<Enrollment>,
) -> ApiResult<Vec<EnrollmentWithStudent>> {
    let mut items = Vec::with_capacity(enrollments.len());
    for enrollment in enrollments {
        let student = storage.get_user_by_id(enrollment.student_id).await?;
        items.push(EnrollmentWithStudent { enrollment, student });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::memory_storage::MemoryStorage;

    async fn user(storage: &MemoryStorage, username: &str, role: UserRole) -> User {
        storage
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@school.edu"),
                password: "hash".to_string(),
                role: Some(role),
                name: None,
                avatar_url: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_enrollment_conflicts() {
        let storage = MemoryStorage::new();
        let teacher = user(&storage, "teacher", UserRole::Instructor).await;
        let student = user(&storage, "student", UserRole::Student).await;
        let course = storage
            .create_course(CreateCourseRequest {
                title: "Algebra".to_string(),
                description: None,
                code: None,
                instructor_id: teacher.id,
            })
            .await
            .unwrap();

        let req = CreateEnrollmentRequest {
            course_id: course.id,
            student_id: student.id,
        };
        enroll(&storage, &student, req.clone()).await.unwrap();
        let err = enroll(&storage, &teacher, req).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyEnrolled);
    }

    #[tokio::test]
    async fn test_student_cannot_enroll_others() {
        let storage = MemoryStorage::new();
        let teacher = user(&storage, "teacher", UserRole::Instructor).await;
        let alice = user(&storage, "alice", UserRole::Student).await;
        let bob = user(&storage, "bob", UserRole::Student).await;
        let course = storage
            .create_course(CreateCourseRequest {
                title: "Biology".to_string(),
                description: None,
                code: None,
                instructor_id: teacher.id,
            })
            .await
            .unwrap();

        let err = enroll(
            &storage,
            &alice,
            CreateEnrollmentRequest {
                course_id: course.id,
                student_id: bob.id,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::CoursePermissionDenied);
    }
}
