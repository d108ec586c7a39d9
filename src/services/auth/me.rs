use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{ApiResponse, auth::responses::UserInfoResponse};
use crate::services::common::current_user;

pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user },
        "User information retrieved successfully",
    )))
}
