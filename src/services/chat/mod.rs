use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::common::{ApiError, ApiResult, app_ai_client, app_storage, current_user};
use crate::ai::{AiClient, features, resolve_credentials};
use crate::config::AppConfig;
use crate::models::ai::requests::ChatRequest;
use crate::models::chat::{
    entities::ChatCommand, requests::CreateChatCommandRequest, responses::ChatHistoryResponse,
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

const MAX_MESSAGE_CHARS: usize = 4000;

pub struct ChatService {
    storage: Option<Arc<dyn Storage>>,
}

impl ChatService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_storage(request),
        }
    }

    pub async fn send(&self, chat_request: ChatRequest, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let ai_client = app_ai_client(request)?;
        let user = current_user(request)?;

        let command = ask(storage.as_ref(), ai_client.as_ref(), &user, chat_request).await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(command, "Chat reply generated")))
    }

    pub async fn history(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let user = current_user(request)?;

        let mut items = storage.list_chat_commands(Some(user.id)).await.map_err(ApiError::from)?;
        items.sort_by_key(|c| (c.created_at, c.id));
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            ChatHistoryResponse { items },
            "Chat history retrieved successfully",
        )))
    }
}

/// 调用当前提供方并记录问答；AI 调用失败时不写记录
pub(crate) async fn ask(
    storage: &dyn Storage,
    ai_client: &dyn AiClient,
    user: &User,
    req: ChatRequest,
) -> ApiResult<ChatCommand> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(ApiError::bad_request(ErrorCode::ValidationFailed, "Message is required"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::bad_request(
            ErrorCode::ValidationFailed,
            format!("Message must be at most {MAX_MESSAGE_CHARS} characters"),
        ));
    }

    let credentials = resolve_credentials(user, &AppConfig::get().ai)?;
    let reply = features::chat(ai_client, &credentials, message).await?;
    info!("Chat reply for user {} via {}", user.id, credentials.provider);

    let command = storage
        .create_chat_command(CreateChatCommandRequest {
            user_id: user.id,
            command: message.to_string(),
            response: Some(reply),
            provider: Some(credentials.provider),
        })
        .await?;
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiPrompt, ProviderCredentials};
    use crate::errors::{AssessError, Result};
    use crate::models::ai::entities::AiProvider;
    use crate::models::users::{entities::UserRole, requests::UpdateAiSettingsRequest};
    use crate::services::test_support::seed_user;
    use crate::storage::memory_storage::MemoryStorage;

    struct ScriptedClient(Result<String>);

    #[async_trait::async_trait]
    impl AiClient for ScriptedClient {
        async fn complete(&self, _: &ProviderCredentials, _: &AiPrompt) -> Result<String> {
            self.0.clone()
        }
    }

    async fn user_with_key(storage: &MemoryStorage) -> User {
        let user = seed_user(storage, "asker", UserRole::Instructor).await;
        storage
            .update_user_ai_settings(
                user.id,
                UpdateAiSettingsRequest {
                    active_provider: Some(AiProvider::DeepSeek),
                    api_keys: Some([(AiProvider::DeepSeek, "sk-test".to_string())].into()),
                },
            )
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_chat_is_recorded_with_provider() {
        let storage = MemoryStorage::new();
        let user = user_with_key(&storage).await;
        let client = ScriptedClient(Ok("Use formative quizzes.".to_string()));

        let command = ask(
            &storage,
            &client,
            &user,
            ChatRequest {
                message: "  How do I check understanding?  ".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(command.command, "How do I check understanding?");
        assert_eq!(command.provider, Some(AiProvider::DeepSeek));
        assert_eq!(storage.list_chat_commands(Some(user.id)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_chat_writes_nothing() {
        let storage = MemoryStorage::new();
        let user = user_with_key(&storage).await;
        let client = ScriptedClient(Err(AssessError::ai_provider("timeout")));

        let err = ask(&storage, &client, &user, ChatRequest { message: "hi".to_string() })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AiRequestFailed);

        let err = ask(&storage, &client, &user, ChatRequest { message: " ".to_string() })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(storage.list_chat_commands(None).await.unwrap().is_empty());
    }
}
