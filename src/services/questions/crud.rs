use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{QuestionService, load_owned_question};
use crate::models::questions::{
    entities::Question,
    requests::{CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest},
    responses::QuestionListResponse,
};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, ApiResult, current_user, load_managed_course};
use crate::storage::Storage;

pub async fn list_questions(
    service: &QuestionService,
    mut query: QuestionListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    if user.role != UserRole::Admin {
        query.instructor_id = Some(user.id);
    }
    let mut items = storage.list_questions(query).await.map_err(ApiError::from)?;
    items.sort_by_key(|q| q.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuestionListResponse { items },
        "Question list retrieved successfully",
    )))
}

pub async fn create_question(
    service: &QuestionService,
    question: CreateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let created = create_checked(storage.as_ref(), &user, question).await?;
    info!("Question {} created by user {}", created.id, user.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        created,
        "Question created successfully",
    )))
}

/// 校验后写入；校验失败不产生任何写入
pub(crate) async fn create_checked(
    storage: &dyn Storage,
    user: &User,
    mut question: CreateQuestionRequest,
) -> ApiResult<Question> {
    question.instructor_id = user.id;
    if let Some(course_id) = question.course_id {
        load_managed_course(storage, user, course_id).await?;
    }
    Question::from_request(0, question.clone(), chrono::Utc::now()).validate()?;
    Ok(storage.create_question(question).await?)
}

pub async fn get_question(
    service: &QuestionService,
    question_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let question = load_owned_question(storage.as_ref(), &user, question_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        question,
        "Question retrieved successfully",
    )))
}

pub async fn update_question(
    service: &QuestionService,
    question_id: i64,
    update: UpdateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let updated = update_checked(storage.as_ref(), &user, question_id, update).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        updated,
        "Question updated successfully",
    )))
}

/// 先在副本上合并并校验，通过后才写入
pub(crate) async fn update_checked(
    storage: &dyn Storage,
    user: &User,
    question_id: i64,
    update: UpdateQuestionRequest,
) -> ApiResult<Question> {
    let mut merged = load_owned_question(storage, user, question_id).await?;
    if let Some(course_id) = update.course_id {
        load_managed_course(storage, user, course_id).await?;
    }
    merged.apply_update(update.clone(), chrono::Utc::now());
    merged.validate()?;

    storage
        .update_question(question_id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::QuestionNotFound, "Question not found"))
}

pub async fn delete_question(
    service: &QuestionService,
    question_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    load_owned_question(storage.as_ref(), &user, question_id).await?;

    storage.delete_question(question_id).await.map_err(ApiError::from)?;
    info!("Question {} deleted by user {}", question_id, user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Question deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::entities::QuestionType;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::memory_storage::MemoryStorage;

    async fn instructor(storage: &MemoryStorage) -> User {
        storage
            .create_user(CreateUserRequest {
                username: "teacher".to_string(),
                email: "teacher@school.edu".to_string(),
                password: "hash".to_string(),
                role: Some(UserRole::Instructor),
                name: None,
                avatar_url: None,
            })
            .await
            .unwrap()
    }

    fn multiple_choice(answer: &str) -> CreateQuestionRequest {
        CreateQuestionRequest {
            instructor_id: 0,
            course_id: None,
            question_type: QuestionType::MultipleChoice,
            question_text: "Capital of France?".to_string(),
            options: Some(vec!["Paris".to_string(), "Rome".to_string()]),
            correct_answer: Some(answer.to_string()),
            points: Some(2),
            difficulty: None,
            explanation: None,
            tags: None,
            ai_generated: None,
        }
    }

    #[tokio::test]
    async fn test_invalid_question_is_not_written() {
        let storage = MemoryStorage::new();
        let user = instructor(&storage).await;

        let err = create_checked(&storage, &user, multiple_choice("Berlin"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let all = storage.list_questions(QuestionListQuery::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_update_validates_merged_record() {
        let storage = MemoryStorage::new();
        let user = instructor(&storage).await;
        let created = create_checked(&storage, &user, multiple_choice("Paris"))
            .await
            .unwrap();
        assert_eq!(created.instructor_id, user.id);

        // 只改选项会让正确答案失效
        let err = update_checked(
            &storage,
            &user,
            created.id,
            UpdateQuestionRequest {
                options: Some(vec!["London".to_string(), "Rome".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let stored = storage.get_question_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.options, vec!["Paris".to_string(), "Rome".to_string()]);
    }
}
