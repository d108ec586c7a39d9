pub mod crud;
pub mod public_link;
pub mod questions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::common::{ApiError, ApiResult, app_storage, can_manage_course, is_enrolled, load_course};
use crate::models::courses::entities::Course;
use crate::models::quizzes::{
    entities::{PublishStatus, Quiz},
    requests::{
        CreateQuizQuestionRequest, CreateQuizRequest, GeneratePublicLinkRequest, QuizListQuery,
        UpdateQuizRequest,
    },
};
use crate::models::users::entities::{User, UserRole};
use crate::models::ErrorCode;
use crate::storage::Storage;

pub struct QuizService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuizService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_storage(request),
        }
    }

    pub async fn list_quizzes(
        &self,
        query: QuizListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::list_quizzes(self, query, request).await
    }

    pub async fn create_quiz(
        &self,
        quiz: CreateQuizRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::create_quiz(self, quiz, request).await
    }

    pub async fn get_quiz(&self, quiz_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        crud::get_quiz(self, quiz_id, request).await
    }

    pub async fn update_quiz(
        &self,
        quiz_id: i64,
        update: UpdateQuizRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::update_quiz(self, quiz_id, update, request).await
    }

    pub async fn delete_quiz(&self, quiz_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        crud::delete_quiz(self, quiz_id, request).await
    }

    // 测验题目
    pub async fn list_quiz_questions(
        &self,
        quiz_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::list_quiz_questions(self, quiz_id, request).await
    }

    pub async fn add_quiz_question(
        &self,
        quiz_id: i64,
        link: CreateQuizQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::add_quiz_question(self, quiz_id, link, request).await
    }

    pub async fn remove_quiz_question(
        &self,
        quiz_id: i64,
        question_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        questions::remove_quiz_question(self, quiz_id, question_id, request).await
    }

    // 公开链接
    pub async fn generate_public_link(
        &self,
        quiz_id: i64,
        link_request: GeneratePublicLinkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        public_link::generate_public_link(self, quiz_id, link_request, request).await
    }

    pub async fn disable_public_link(
        &self,
        quiz_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        public_link::disable_public_link(self, quiz_id, request).await
    }

    pub async fn list_public_submissions(
        &self,
        quiz_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        public_link::list_public_submissions(self, quiz_id, request).await
    }
}

pub(crate) async fn load_quiz(storage: &dyn Storage, quiz_id: i64) -> ApiResult<Quiz> {
    storage
        .get_quiz_by_id(quiz_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::QuizNotFound, "Quiz not found"))
}

/// 加载测验并确认当前用户是所属课程的管理者
pub(crate) async fn load_managed_quiz(
    storage: &dyn Storage,
    user: &User,
    quiz_id: i64,
) -> ApiResult<(Quiz, Course)> {
    let quiz = load_quiz(storage, quiz_id).await?;
    let course = load_course(storage, quiz.course_id).await?;
    if !can_manage_course(user, &course) {
        return Err(ApiError::forbidden(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to manage this quiz",
        ));
    }
    Ok((quiz, course))
}

/// 管理者可见全部测验；学生只能看到已选课程中已发布的测验
pub(crate) async fn load_visible_quiz(
    storage: &dyn Storage,
    user: &User,
    quiz_id: i64,
) -> ApiResult<(Quiz, Course)> {
    let quiz = load_quiz(storage, quiz_id).await?;
    let course = load_course(storage, quiz.course_id).await?;
    if can_manage_course(user, &course) {
        return Ok((quiz, course));
    }
    if user.role == UserRole::Student && is_enrolled(storage, course.id, user.id).await? {
        if quiz.status == PublishStatus::Published {
            return Ok((quiz, course));
        }
        return Err(ApiError::forbidden(
            ErrorCode::QuizNotAvailable,
            "Quiz is not published",
        ));
    }
    Err(ApiError::forbidden(
        ErrorCode::CoursePermissionDenied,
        "You do not have access to this quiz",
    ))
}
