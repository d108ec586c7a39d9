use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::ai::requests::ChatRequest;
use crate::services::ChatService;

static CHAT_SERVICE: Lazy<ChatService> = Lazy::new(ChatService::new_lazy);

pub async fn send(req: HttpRequest, chat_request: web::Json<ChatRequest>) -> ActixResult<HttpResponse> {
    CHAT_SERVICE.send(chat_request.into_inner(), &req).await
}

pub async fn history(req: HttpRequest) -> ActixResult<HttpResponse> {
    CHAT_SERVICE.history(&req).await
}

pub fn configure_chat_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/chat")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(history))
            .route("", web::post().to(send)),
    );
}
