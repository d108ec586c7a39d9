use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{QuizService, load_managed_quiz};
use crate::models::public_quiz::responses::PublicSubmissionListResponse;
use crate::models::quizzes::{
    entities::PublicAccess,
    requests::GeneratePublicLinkRequest,
    responses::PublicLinkResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::common::{ApiError, current_user};

/// 不透明的公开访问令牌
pub(crate) fn new_public_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub(crate) fn public_path(token: &str) -> String {
    format!("/public/quiz/{token}")
}

pub async fn generate_public_link(
    service: &QuizService,
    quiz_id: i64,
    link_request: GeneratePublicLinkRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    load_managed_quiz(storage.as_ref(), &user, quiz_id).await?;

    let required_fields = link_request.required_fields.map(|fields| {
        fields
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect()
    });

    // 重新生成会覆盖旧令牌
    let token = new_public_token();
    let quiz = storage
        .set_quiz_public_access(
            quiz_id,
            PublicAccess::Enable {
                token: token.clone(),
                permission: link_request.permission,
                required_fields,
            },
        )
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(ErrorCode::QuizNotFound, "Quiz not found"))?;
    info!(
        "Public link ({}) generated for quiz {}",
        link_request.permission, quiz.id
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PublicLinkResponse {
            quiz_id: quiz.id,
            path: public_path(&token),
            token,
            permission: link_request.permission,
        },
        "Public link generated successfully",
    )))
}

pub async fn disable_public_link(
    service: &QuizService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    load_managed_quiz(storage.as_ref(), &user, quiz_id).await?;

    let quiz = storage
        .set_quiz_public_access(quiz_id, PublicAccess::Disable)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(ErrorCode::QuizNotFound, "Quiz not found"))?;
    info!("Public link disabled for quiz {}", quiz.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(quiz, "Public link disabled")))
}

pub async fn list_public_submissions(
    service: &QuizService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    load_managed_quiz(storage.as_ref(), &user, quiz_id).await?;

    let mut items = storage
        .list_public_submissions(Some(quiz_id))
        .await
        .map_err(ApiError::from)?;
    items.sort_by_key(|s| s.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PublicSubmissionListResponse { items },
        "Public submissions retrieved successfully",
    )))
}
