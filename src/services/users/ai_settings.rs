use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::ai::provider::platform_providers;
use crate::config::AppConfig;
use crate::models::users::{
    entities::User, requests::UpdateAiSettingsRequest, responses::AiSettingsResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user};

/// 只暴露配置了哪些提供方，不返回密钥
pub(crate) fn settings_of(user: &User) -> AiSettingsResponse {
    AiSettingsResponse {
        active_provider: user.active_ai_provider,
        configured_providers: user.ai_api_keys.keys().copied().collect(),
        platform_providers: platform_providers(&AppConfig::get().ai),
    }
}

pub async fn get_ai_settings(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        settings_of(&user),
        "AI settings retrieved successfully",
    )))
}

pub async fn update_ai_settings(
    service: &UserService,
    update: UpdateAiSettingsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let updated = storage
        .update_user_ai_settings(user.id, update)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(ErrorCode::UserNotFound, "User not found"))?;
    info!(
        "User {} updated AI settings (active provider: {})",
        updated.id, updated.active_ai_provider
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        settings_of(&updated),
        "AI settings updated successfully",
    )))
}
