use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{UpdateAiSettingsRequest, UserListParams};
use crate::services::UserService;

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn get_ai_settings(req: HttpRequest) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_ai_settings(&req).await
}

pub async fn update_ai_settings(
    req: HttpRequest,
    update: web::Json<UpdateAiSettingsRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_ai_settings(update.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(middlewares::RequireJWT)
            // 当前用户的 AI 设置 - 所有登录用户
            .service(
                web::resource("/me/ai-settings")
                    .route(web::get().to(get_ai_settings))
                    .route(web::put().to(update_ai_settings)),
            )
            .service(
                web::resource("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles()))
                    .route(web::get().to(list_users)),
            ),
    );
}
