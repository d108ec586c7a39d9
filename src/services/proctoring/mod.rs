//! 监考违规记录
//!
//! 学生在作答监考测验时上报违规；课程管理者查看并标记已复核。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{info, warn};

use super::common::{ApiError, ApiResult, app_storage, current_user};
use crate::models::proctoring::{
    entities::ProctoringViolation,
    requests::{CreateViolationRequest, UpdateViolationRequest},
    responses::ViolationListResponse,
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::quiz_submissions::load_submission;
use crate::storage::Storage;

pub struct ProctoringService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProctoringService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_storage(request),
        }
    }

    pub async fn log_violation(
        &self,
        submission_id: i64,
        violation: CreateViolationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;

        let created = record_violation(storage.as_ref(), &user, submission_id, violation).await?;
        warn!(
            "Proctoring violation {} ({}) on submission {}",
            created.violation_type, created.severity, submission_id
        );
        Ok(HttpResponse::Created().json(ApiResponse::success(
            created,
            "Violation recorded",
        )))
    }

    pub async fn list_violations(
        &self,
        submission_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;
        ensure_reviewer(storage.as_ref(), &user, submission_id).await?;

        let mut items = storage
            .list_violations(Some(submission_id))
            .await
            .map_err(ApiError::from)?;
        items.sort_by_key(|v| (v.occurred_at, v.id));

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            ViolationListResponse { items },
            "Violations retrieved successfully",
        )))
    }

    pub async fn review_violation(
        &self,
        submission_id: i64,
        violation_id: i64,
        update: UpdateViolationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;

        let updated =
            update_violation(storage.as_ref(), &user, submission_id, violation_id, update).await?;
        info!(
            "Violation {} reviewed by user {} (reviewed: {})",
            violation_id, user.id, updated.reviewed
        );
        Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Violation updated")))
    }
}

/// 只有作答学生本人可以在监考测验上上报
pub(crate) async fn record_violation(
    storage: &dyn Storage,
    user: &User,
    submission_id: i64,
    mut violation: CreateViolationRequest,
) -> ApiResult<ProctoringViolation> {
    let ctx = load_submission(storage, submission_id).await?;
    if !ctx.is_owner(user) {
        return Err(ApiError::forbidden(
            ErrorCode::Forbidden,
            "Violations can only be reported by the student taking the quiz",
        ));
    }
    if !ctx.quiz.proctored {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            "This quiz is not proctored",
        ));
    }

    violation.submission_id = submission_id;
    Ok(storage.create_violation(violation).await?)
}

async fn ensure_reviewer(storage: &dyn Storage, user: &User, submission_id: i64) -> ApiResult<()> {
    let ctx = load_submission(storage, submission_id).await?;
    if !ctx.is_manager(user) {
        return Err(ApiError::forbidden(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to review these violations",
        ));
    }
    Ok(())
}

pub(crate) async fn update_violation(
    storage: &dyn Storage,
    user: &User,
    submission_id: i64,
    violation_id: i64,
    update: UpdateViolationRequest,
) -> ApiResult<ProctoringViolation> {
    ensure_reviewer(storage, user, submission_id).await?;

    let belongs = storage
        .list_violations(Some(submission_id))
        .await?
        .iter()
        .any(|v| v.id == violation_id);
    if !belongs {
        return Err(ApiError::not_found(ErrorCode::NotFound, "Violation not found"));
    }

    storage
        .update_violation(violation_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::NotFound, "Violation not found"))
}
