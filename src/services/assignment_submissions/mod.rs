pub mod ai;
pub mod grade;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::common::{ApiError, ApiResult, app_ai_client, app_storage, can_manage_course, load_course};
use crate::ai::AiClient;
use crate::models::assignment_submissions::{
    entities::AssignmentSubmission,
    requests::{GradeAssignmentRequest, SubmitAssignmentRequest},
};
use crate::models::assignments::entities::Assignment;
use crate::models::courses::entities::Course;
use crate::models::users::entities::User;
use crate::models::ErrorCode;
use crate::services::assignments::load_assignment;
use crate::storage::Storage;

pub struct AssignmentSubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentSubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_storage(request),
        }
    }

    pub(crate) fn get_ai_client(&self, request: &HttpRequest) -> ApiResult<Arc<dyn AiClient>> {
        app_ai_client(request)
    }

    pub async fn list_for_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::list_for_assignment(self, assignment_id, request).await
    }

    // 学生提交作业
    pub async fn submit(
        &self,
        assignment_id: i64,
        submit_request: SubmitAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit(self, assignment_id, submit_request, request).await
    }

    pub async fn get_submission(
        &self,
        submission_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::get_submission(self, submission_id, request).await
    }

    // 人工评分
    pub async fn grade(
        &self,
        submission_id: i64,
        grade_request: GradeAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade(self, submission_id, grade_request, request).await
    }

    // AI 评分
    pub async fn ai_grade(&self, submission_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        ai::ai_grade(self, submission_id, request).await
    }

    // AI 生成内容检测
    pub async fn ai_detect(&self, submission_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        ai::ai_detect(self, submission_id, request).await
    }
}

pub(crate) struct SubmissionContext {
    pub submission: AssignmentSubmission,
    pub assignment: Assignment,
    pub course: Course,
}

pub(crate) async fn load_submission(
    storage: &dyn Storage,
    submission_id: i64,
) -> ApiResult<SubmissionContext> {
    let submission = storage
        .get_assignment_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::SubmissionNotFound, "Submission not found"))?;
    let assignment = load_assignment(storage, submission.assignment_id).await?;
    let course = load_course(storage, assignment.course_id).await?;
    Ok(SubmissionContext {
        submission,
        assignment,
        course,
    })
}

/// 评分类操作只允许课程管理者
pub(crate) async fn load_gradable_submission(
    storage: &dyn Storage,
    user: &User,
    submission_id: i64,
) -> ApiResult<SubmissionContext> {
    let ctx = load_submission(storage, submission_id).await?;
    if !can_manage_course(user, &ctx.course) {
        return Err(ApiError::forbidden(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to grade this submission",
        ));
    }
    Ok(ctx)
}
