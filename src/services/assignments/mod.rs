//! 作业管理

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use super::common::{
    ApiError, ApiResult, app_storage, can_manage_course, current_user, is_enrolled, load_course,
    load_managed_course, load_visible_course,
};
use crate::models::assignments::{
    entities::{Assignment, RubricCriterion},
    requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
    responses::AssignmentListResponse,
};
use crate::models::courses::entities::Course;
use crate::models::quizzes::entities::PublishStatus;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_storage(request),
        }
    }

    pub async fn list_assignments(
        &self,
        query: AssignmentListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;

        let manager = match query.course_id {
            Some(course_id) => {
                let course = load_visible_course(storage.as_ref(), &user, course_id).await?;
                can_manage_course(&user, &course)
            }
            None if user.role == UserRole::Admin => true,
            None => {
                return Err(
                    ApiError::bad_request(ErrorCode::BadRequest, "courseId is required").into(),
                );
            }
        };

        let mut items = storage.list_assignments(query).await.map_err(ApiError::from)?;
        if !manager {
            items.retain(|a| a.status == PublishStatus::Published);
        }
        items.sort_by_key(|a| a.id);

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssignmentListResponse { items },
            "Assignment list retrieved successfully",
        )))
    }

    pub async fn create_assignment(
        &self,
        assignment: CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;
        load_managed_course(storage.as_ref(), &user, assignment.course_id).await?;
        check_assignment(
            Some(&assignment.title),
            assignment.max_score,
            assignment.rubric.as_deref(),
        )?;

        let created = storage
            .create_assignment(assignment)
            .await
            .map_err(ApiError::from)?;
        info!(
            "Assignment {} created in course {}",
            created.id, created.course_id
        );
        Ok(HttpResponse::Created().json(ApiResponse::success(
            created,
            "Assignment created successfully",
        )))
    }

    pub async fn get_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;

        let (assignment, _) = load_visible_assignment(storage.as_ref(), &user, assignment_id).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment retrieved successfully",
        )))
    }

    pub async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;
        load_managed_assignment(storage.as_ref(), &user, assignment_id).await?;
        check_assignment(update.title.as_deref(), update.max_score, update.rubric.as_deref())?;

        let assignment = storage
            .update_assignment(assignment_id, update)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| {
                ApiError::not_found(ErrorCode::AssignmentNotFound, "Assignment not found")
            })?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment updated successfully",
        )))
    }

    pub async fn delete_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;
        load_managed_assignment(storage.as_ref(), &user, assignment_id).await?;

        storage
            .delete_assignment(assignment_id)
            .await
            .map_err(ApiError::from)?;
        info!("Assignment {} deleted by user {}", assignment_id, user.id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Assignment deleted successfully")))
    }
}

/// 满分必须为正；评分细则名称非空且不重复，单项满分不为负
fn check_assignment(
    title: Option<&str>,
    max_score: Option<f64>,
    rubric: Option<&[RubricCriterion]>,
) -> ApiResult<()> {
    let invalid = |msg: &str| -> ApiResult<()> {
        Err(ApiError::bad_request(ErrorCode::ValidationFailed, msg))
    };

    if title.is_some_and(|t| t.trim().is_empty()) {
        return invalid("Assignment title is required");
    }
    if max_score.is_some_and(|s| !s.is_finite() || s <= 0.0) {
        return invalid("Max score must be greater than 0");
    }
    let mut names = HashSet::new();
    for criterion in rubric.unwrap_or_default() {
        let name = criterion.criterion.trim().to_lowercase();
        if name.is_empty() {
            return invalid("Rubric criterion name is required");
        }
        if !names.insert(name) {
            return invalid("Rubric criterion names must be unique");
        }
        if !criterion.max_points.is_finite() || criterion.max_points < 0.0 {
            return invalid("Rubric max points must not be negative");
        }
    }
    Ok(())
}

pub(crate) async fn load_assignment(storage: &dyn Storage, assignment_id: i64) -> ApiResult<Assignment> {
    storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::AssignmentNotFound, "Assignment not found"))
}

pub(crate) async fn load_managed_assignment(
    storage: &dyn Storage,
    user: &User,
    assignment_id: i64,
) -> ApiResult<(Assignment, Course)> {
    let assignment = load_assignment(storage, assignment_id).await?;
    let course = load_course(storage, assignment.course_id).await?;
    if !can_manage_course(user, &course) {
        return Err(ApiError::forbidden(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to manage this assignment",
        ));
    }
    Ok((assignment, course))
}

/// 学生只能看到已选课程中已发布的作业
pub(crate) async fn load_visible_assignment(
    storage: &dyn Storage,
    user: &User,
    assignment_id: i64,
) -> ApiResult<(Assignment, Course)> {
    let assignment = load_assignment(storage, assignment_id).await?;
    let course = load_course(storage, assignment.course_id).await?;
    if can_manage_course(user, &course) {
        return Ok((assignment, course));
    }
    if user.role == UserRole::Student
        && assignment.status == PublishStatus::Published
        && is_enrolled(storage, course.id, user.id).await?
    {
        return Ok((assignment, course));
    }
    Err(ApiError::forbidden(
        ErrorCode::CoursePermissionDenied,
        "You do not have access to this assignment",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(name: &str, max_points: f64) -> RubricCriterion {
        RubricCriterion {
            criterion: name.to_string(),
            max_points,
            description: None,
        }
    }

    #[test]
    fn test_check_assignment() {
        assert!(check_assignment(Some("Essay"), Some(100.0), None).is_ok());
        assert!(check_assignment(Some(""), None, None).is_err());
        assert!(check_assignment(None, Some(0.0), None).is_err());

        let rubric = vec![criterion("Clarity", 10.0), criterion("clarity ", 5.0)];
        assert!(check_assignment(None, None, Some(&rubric)).is_err());

        let rubric = vec![criterion("Clarity", -1.0)];
        assert!(check_assignment(None, None, Some(&rubric)).is_err());

        let rubric = vec![criterion("Clarity", 10.0), criterion("Evidence", 10.0)];
        assert!(check_assignment(None, None, Some(&rubric)).is_ok());
    }
}
