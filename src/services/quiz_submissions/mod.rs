pub mod attempts;
pub mod grade;
pub mod scoring;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::common::{ApiError, ApiResult, app_storage, can_manage_course, load_course};
use crate::models::courses::entities::Course;
use crate::models::quiz_submissions::{
    entities::QuizSubmission,
    requests::{GradeQuizSubmissionRequest, SubmitQuizRequest},
};
use crate::models::quizzes::entities::Quiz;
use crate::models::users::entities::User;
use crate::models::ErrorCode;
use crate::services::quizzes::load_quiz;
use crate::storage::Storage;

pub struct QuizSubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuizSubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_storage(request),
        }
    }

    // 开始作答
    pub async fn start_attempt(&self, quiz_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        attempts::start_attempt(self, quiz_id, request).await
    }

    // 测验的提交列表
    pub async fn list_for_quiz(&self, quiz_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        attempts::list_for_quiz(self, quiz_id, request).await
    }

    pub async fn get_submission(
        &self,
        submission_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attempts::get_submission(self, submission_id, request).await
    }

    // 交卷并自动评分
    pub async fn submit(
        &self,
        submission_id: i64,
        submit_request: SubmitQuizRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attempts::submit(self, submission_id, submit_request, request).await
    }

    // 人工评分
    pub async fn grade(
        &self,
        submission_id: i64,
        grade_request: GradeQuizSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade(self, submission_id, grade_request, request).await
    }
}

/// 提交及其所属测验与课程
pub(crate) struct SubmissionContext {
    pub submission: QuizSubmission,
    pub quiz: Quiz,
    pub course: Course,
}

impl SubmissionContext {
    pub fn is_owner(&self, user: &User) -> bool {
        self.submission.student_id == user.id
    }

    pub fn is_manager(&self, user: &User) -> bool {
        can_manage_course(user, &self.course)
    }
}

pub(crate) async fn load_submission(
    storage: &dyn Storage,
    submission_id: i64,
) -> ApiResult<SubmissionContext> {
    let submission = storage
        .get_quiz_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::SubmissionNotFound, "Submission not found"))?;
    let quiz = load_quiz(storage, submission.quiz_id).await?;
    let course = load_course(storage, quiz.course_id).await?;
    Ok(SubmissionContext {
        submission,
        quiz,
        course,
    })
}

/// 作答学生本人或课程管理者可以查看
pub(crate) async fn load_readable_submission(
    storage: &dyn Storage,
    user: &User,
    submission_id: i64,
) -> ApiResult<SubmissionContext> {
    let ctx = load_submission(storage, submission_id).await?;
    if ctx.is_owner(user) || ctx.is_manager(user) {
        Ok(ctx)
    } else {
        Err(ApiError::forbidden(
            ErrorCode::Forbidden,
            "You do not have access to this submission",
        ))
    }
}
