use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::services::common::ApiError;
use crate::utils::password::verify_password;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = service.get_config();

    // 用户名或邮箱均可登录；用户不存在与密码错误返回同一提示
    let user = storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
        .map_err(ApiError::from)?
        .filter(|user| verify_password(&login_request.password, &user.password_hash))
        .ok_or_else(|| {
            ApiError::new(
                actix_web::http::StatusCode::UNAUTHORIZED,
                ErrorCode::AuthFailed,
                "Username or password is incorrect",
            )
        })?;

    let access_token = user.generate_access_token().map_err(ApiError::from)?;
    info!("User {} logged in successfully", user.username);

    let response = LoginResponse {
        access_token,
        expires_in: config.jwt.access_token_expiry,
        user,
        created_at: chrono::Utc::now(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
}
