#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use rust_assessment_next::ai::{AiClient, AiPrompt, ProviderCredentials};
use rust_assessment_next::errors::{AssessError, Result};
use rust_assessment_next::models::users::entities::{User, UserRole};
use rust_assessment_next::models::users::requests::CreateUserRequest;
use rust_assessment_next::storage::Storage;
use rust_assessment_next::storage::memory_storage::MemoryStorage;
use rust_assessment_next::utils::jwt::JwtUtils;
use rust_assessment_next::utils::password::hash_password;

pub const PASSWORD: &str = "Str0ngPassw0rd";

/// 测试中不访问外部 AI 服务
pub struct OfflineAiClient;

#[async_trait]
impl AiClient for OfflineAiClient {
    async fn complete(&self, _: &ProviderCredentials, _: &AiPrompt) -> Result<String> {
        Err(AssessError::ai_provider("offline"))
    }
}

pub fn storage() -> Arc<dyn Storage> {
    Arc::new(MemoryStorage::new())
}

pub fn ai_client() -> Arc<dyn AiClient> {
    Arc::new(OfflineAiClient)
}

/// 直接写入存储创建用户，返回用户与访问令牌
pub async fn seed_user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> (User, String) {
    let user = storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: hash_password(PASSWORD).unwrap(),
            role: Some(role),
            name: None,
            avatar_url: None,
        })
        .await
        .unwrap();
    let token = JwtUtils::generate_access_token(user.id, user.role).unwrap();
    (user, token)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// 以给定存储构建完整应用
#[macro_export]
macro_rules! test_app {
    ($storage:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($storage.clone()))
                .app_data(actix_web::web::Data::new(common::ai_client()))
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(rust_assessment_next::utils::json_error_handler),
                )
                .configure(rust_assessment_next::routes::configure_api),
        )
        .await
    };
}
