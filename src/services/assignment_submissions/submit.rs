use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentSubmissionService, load_submission};
use crate::models::assignment_submissions::{
    entities::AssignmentSubmission,
    requests::{
        AssignmentSubmissionListQuery, CreateAssignmentSubmissionRequest, SubmitAssignmentRequest,
        UpdateAssignmentSubmissionRequest,
    },
    responses::AssignmentSubmissionListResponse,
};
use crate::models::common::submission_status::SubmissionStatus;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::load_visible_assignment;
use crate::services::common::{ApiError, ApiResult, can_manage_course, current_user};
use crate::storage::Storage;

/// 提交或重新提交作业；已评分的提交不能覆盖
pub(crate) async fn submit_work(
    storage: &dyn Storage,
    user: &User,
    assignment_id: i64,
    req: SubmitAssignmentRequest,
) -> ApiResult<(AssignmentSubmission, bool)> {
    if user.role != UserRole::Student {
        return Err(ApiError::forbidden(
            ErrorCode::Forbidden,
            "Only students can submit assignments",
        ));
    }
    let (assignment, _) = load_visible_assignment(storage, user, assignment_id).await?;

    let now = chrono::Utc::now();
    if assignment.due_date.is_some_and(|due| now > due) && !assignment.allow_late_submission {
        return Err(ApiError::forbidden(
            ErrorCode::SubmissionLate,
            "The due date has passed and late submissions are not allowed",
        ));
    }

    let content = req.content.filter(|c| !c.trim().is_empty());
    let file_urls: Vec<String> = req
        .file_urls
        .into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();
    if content.is_none() && file_urls.is_empty() {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "Submission needs text content or at least one file",
        ));
    }

    let existing = storage
        .list_assignment_submissions(AssignmentSubmissionListQuery {
            assignment_id: Some(assignment_id),
            student_id: Some(user.id),
        })
        .await?
        .into_iter()
        .max_by_key(|s| s.id);

    match existing {
        Some(previous) if previous.status == SubmissionStatus::Graded => Err(ApiError::conflict(
            ErrorCode::SubmissionStatusInvalid,
            "This assignment has already been graded",
        )),
        Some(previous) => {
            let updated = storage
                .update_assignment_submission(
                    previous.id,
                    UpdateAssignmentSubmissionRequest {
                        content,
                        file_urls: Some(file_urls),
                        status: Some(SubmissionStatus::Submitted),
                        submitted_at: Some(now),
                        ..Default::default()
                    },
                )
                .await?
                .ok_or_else(|| {
                    ApiError::not_found(ErrorCode::SubmissionNotFound, "Submission not found")
                })?;
            Ok((updated, false))
        }
        None => {
            let created = storage
                .create_assignment_submission(CreateAssignmentSubmissionRequest {
                    assignment_id,
                    student_id: user.id,
                    content,
                    file_urls: Some(file_urls),
                    status: Some(SubmissionStatus::Submitted),
                })
                .await?;
            Ok((created, true))
        }
    }
}

pub async fn submit(
    service: &AssignmentSubmissionService,
    assignment_id: i64,
    submit_request: SubmitAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let (submission, created) =
        submit_work(storage.as_ref(), &user, assignment_id, submit_request).await?;
    info!(
        "Student {} submitted assignment {} (submission {})",
        user.id, assignment_id, submission.id
    );
    let body = ApiResponse::success(submission, "Assignment submitted successfully");
    if created {
        Ok(HttpResponse::Created().json(body))
    } else {
        Ok(HttpResponse::Ok().json(body))
    }
}

pub async fn list_for_assignment(
    service: &AssignmentSubmissionService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let (_, course) = load_visible_assignment(storage.as_ref(), &user, assignment_id).await?;
    let student_id = (!can_manage_course(&user, &course)).then_some(user.id);

    let mut items = storage
        .list_assignment_submissions(AssignmentSubmissionListQuery {
            assignment_id: Some(assignment_id),
            student_id,
        })
        .await
        .map_err(ApiError::from)?;
    items.sort_by_key(|s| s.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentSubmissionListResponse { items },
        "Assignment submissions retrieved successfully",
    )))
}

pub async fn get_submission(
    service: &AssignmentSubmissionService,
    submission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let ctx = load_submission(storage.as_ref(), submission_id).await?;
    if ctx.submission.student_id != user.id && !can_manage_course(&user, &ctx.course) {
        return Err(ApiError::forbidden(
            ErrorCode::Forbidden,
            "You do not have access to this submission",
        )
        .into());
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ctx.submission,
        "Submission retrieved successfully",
    )))
}
