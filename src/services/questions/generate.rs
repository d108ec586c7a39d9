use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::QuestionService;
use crate::ai::{AiClient, features, resolve_credentials};
use crate::config::AppConfig;
use crate::models::ai::{requests::GenerateQuestionsRequest, responses::GenerateQuestionsResponse};
use crate::models::questions::entities::Question;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, ApiResult, current_user, load_managed_course};
use crate::storage::Storage;

const MAX_GENERATED: u32 = 20;

pub async fn generate_questions(
    service: &QuestionService,
    generate_request: GenerateQuestionsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let ai_client = service.get_ai_client(request)?;
    let user = current_user(request)?;

    let items = generate_and_store(storage.as_ref(), ai_client.as_ref(), &user, generate_request)
        .await?;
    info!("Generated {} questions for user {}", items.len(), user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        GenerateQuestionsResponse { items },
        "Questions generated successfully",
    )))
}

/// 全部草稿通过校验后才开始写入
pub(crate) async fn generate_and_store(
    storage: &dyn Storage,
    ai_client: &dyn AiClient,
    user: &User,
    req: GenerateQuestionsRequest,
) -> ApiResult<Vec<Question>> {
    if req.topic.trim().is_empty() {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "Topic is required"));
    }
    if req.count == 0 || req.count > MAX_GENERATED {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            format!("Count must be between 1 and {MAX_GENERATED}"),
        ));
    }
    if let Some(course_id) = req.course_id {
        load_managed_course(storage, user, course_id).await?;
    }

    let credentials = resolve_credentials(user, &AppConfig::get().ai)?;
    let drafts = features::generate_questions(ai_client, &credentials, &req, user.id).await?;

    let mut created = Vec::with_capacity(drafts.len());
    for draft in drafts {
        created.push(storage.create_question(draft).await?);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiPrompt, ProviderCredentials};
    use crate::errors::{AssessError, Result};
    use crate::models::ai::entities::AiProvider;
    use crate::models::questions::{entities::QuestionType, requests::QuestionListQuery};
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::storage::memory_storage::MemoryStorage;

    struct ScriptedClient(Result<String>);

    #[async_trait::async_trait]
    impl AiClient for ScriptedClient {
        async fn complete(&self, _: &ProviderCredentials, _: &AiPrompt) -> Result<String> {
            self.0.clone()
        }
    }

    async fn instructor(storage: &MemoryStorage) -> User {
        let user = storage
            .create_user(CreateUserRequest {
                username: "teacher".to_string(),
                email: "teacher@school.edu".to_string(),
                password: "hash".to_string(),
                role: Some(UserRole::Instructor),
                name: None,
                avatar_url: None,
            })
            .await
            .unwrap();
        let mut keys = std::collections::BTreeMap::new();
        keys.insert(AiProvider::OpenAi, "sk-test".to_string());
        storage
            .update_user_ai_settings(
                user.id,
                crate::models::users::requests::UpdateAiSettingsRequest {
                    active_provider: None,
                    api_keys: Some(keys),
                },
            )
            .await
            .unwrap()
            .unwrap()
    }

    fn request() -> GenerateQuestionsRequest {
        GenerateQuestionsRequest {
            topic: "Geography".to_string(),
            count: 2,
            question_type: QuestionType::TrueFalse,
            difficulty: None,
            course_id: None,
            context: None,
        }
    }

    #[tokio::test]
    async fn test_generated_questions_are_stored() {
        let storage = MemoryStorage::new();
        let user = instructor(&storage).await;
        let client = ScriptedClient(Ok(r#"[
            {"questionText": "Paris is in France", "correctAnswer": "true"},
            {"questionText": "Rome is in Spain", "correctAnswer": "false"}
        ]"#
        .to_string()));

        let created = generate_and_store(&storage, &client, &user, request())
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|q| q.ai_generated));
    }

    #[tokio::test]
    async fn test_ai_failure_writes_nothing() {
        let storage = MemoryStorage::new();
        let user = instructor(&storage).await;
        let client = ScriptedClient(Err(AssessError::ai_provider("timeout")));

        let err = generate_and_store(&storage, &client, &user, request())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AiRequestFailed);
        let all = storage.list_questions(QuestionListQuery::default()).await.unwrap();
        assert!(all.is_empty());
    }
}
