use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::public_quiz::requests::PublicQuizSubmitRequest;
use crate::services::PublicQuizService;

static PUBLIC_QUIZ_SERVICE: Lazy<PublicQuizService> = Lazy::new(PublicQuizService::new_lazy);

pub async fn view_quiz(req: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
    PUBLIC_QUIZ_SERVICE.view(&path.into_inner(), &req).await
}

pub async fn submit_quiz(
    req: HttpRequest,
    path: web::Path<String>,
    submit_request: web::Json<PublicQuizSubmitRequest>,
) -> ActixResult<HttpResponse> {
    PUBLIC_QUIZ_SERVICE
        .submit(&path.into_inner(), submit_request.into_inner(), &req)
        .await
}

// 配置路由；无需登录，按 IP 限流
pub fn configure_public_quiz_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/public/quiz")
            .wrap(middlewares::RateLimit::public_quiz())
            .route("/{token}", web::get().to(view_quiz))
            .route("/{token}/submit", web::post().to(submit_quiz)),
    );
}
