use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AuthService;
use crate::models::auth::requests::RegisterRequest;
use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, ApiResult};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_username};

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let create_request = prepare_user(storage.as_ref(), register_request).await?;

    let user = storage
        .create_user(create_request)
        .await
        .map_err(ApiError::from)?;
    info!("User {} registered as {}", user.username, user.role);

    Ok(HttpResponse::Created().json(ApiResponse::success(user, "注册成功")))
}

/// 校验注册信息并生成存储层载荷（密码已哈希）
async fn prepare_user(
    storage: &dyn Storage,
    req: RegisterRequest,
) -> ApiResult<CreateUserRequest> {
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_lowercase();

    validate_username(&username)
        .map_err(|e| ApiError::bad_request(ErrorCode::UserNameInvalid, e.message()))?;
    validate_email(&email)
        .map_err(|e| ApiError::bad_request(ErrorCode::UserEmailInvalid, e.message()))?;
    validate_password(&req.password)
        .map_err(|e| ApiError::bad_request(ErrorCode::UserPasswordInvalid, e.message()))?;

    // 管理员账号不能自行注册
    let role = req.role.unwrap_or(UserRole::Student);
    if role == UserRole::Admin {
        return Err(ApiError::forbidden(
            ErrorCode::Forbidden,
            "Admin accounts cannot be registered",
        ));
    }

    if storage.get_user_by_username(&username).await?.is_some() {
        return Err(ApiError::conflict(
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        ));
    }
    if storage.get_user_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ));
    }

    let password = hash_password(&req.password).map_err(|e| {
        ApiError::new(
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::RegisterFailed,
            e.message(),
        )
    })?;

    Ok(CreateUserRequest {
        username,
        email,
        password,
        role: Some(role),
        name: req.name,
        avatar_url: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory_storage::MemoryStorage;

    fn request(username: &str, email: &str, role: Option<UserRole>) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "SecurePass123".to_string(),
            name: None,
            role,
        }
    }

    #[tokio::test]
    async fn test_prepare_user_hashes_password_and_defaults_role() {
        let storage = MemoryStorage::new();
        let user = prepare_user(&storage, request("alice", "Alice@School.edu", None))
            .await
            .unwrap();
        assert_eq!(user.role, Some(UserRole::Student));
        assert_eq!(user.email, "alice@school.edu");
        assert_ne!(user.password, "SecurePass123");
    }

    #[tokio::test]
    async fn test_admin_role_is_rejected() {
        let storage = MemoryStorage::new();
        let err = prepare_user(&storage, request("mallory", "m@school.edu", Some(UserRole::Admin)))
            .await
            .unwrap_err();
        assert_eq!(err.status, actix_web::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let storage = MemoryStorage::new();
        let first = prepare_user(&storage, request("bob", "bob@school.edu", None))
            .await
            .unwrap();
        storage.create_user(first).await.unwrap();

        let err = prepare_user(&storage, request("bob", "other@school.edu", None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNameAlreadyExists);
    }
}
