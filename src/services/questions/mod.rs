pub mod crud;
pub mod generate;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::common::{ApiError, ApiResult, app_ai_client, app_storage};
use crate::ai::AiClient;
use crate::models::ai::requests::GenerateQuestionsRequest;
use crate::models::questions::{
    entities::Question,
    requests::{CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest},
};
use crate::models::users::entities::{User, UserRole};
use crate::models::ErrorCode;
use crate::storage::Storage;

pub struct QuestionService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuestionService {
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

    pub async fn list_questions(
        &self,
        query: QuestionListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::list_questions(self, query, request).await
    }

    pub async fn create_question(
        &self,
        question: CreateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::create_question(self, question, request).await
    }

    pub async fn get_question(
        &self,
        question_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::get_question(self, question_id, request).await
    }

    pub async fn update_question(
        &self,
        question_id: i64,
        update: UpdateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::update_question(self, question_id, update, request).await
    }

    pub async fn delete_question(
        &self,
        question_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::delete_question(self, question_id, request).await
    }

    // AI 出题
    pub async fn generate_questions(
        &self,
        generate_request: GenerateQuestionsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_questions(self, generate_request, request).await
    }
}

/// 题目归出题教师所有，管理员可访问全部
pub(crate) async fn load_owned_question(
    storage: &dyn Storage,
    user: &User,
    question_id: i64,
) -> ApiResult<Question> {
    let question = storage
        .get_question_by_id(question_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::QuestionNotFound, "Question not found"))?;
    if user.role != UserRole::Admin && question.instructor_id != user.id {
        return Err(ApiError::forbidden(
            ErrorCode::Forbidden,
            "You do not have permission to access this question",
        ));
    }
    Ok(question)
}
