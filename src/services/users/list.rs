use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{ApiResponse, PaginatedResponse, users::requests::UserListParams};
use crate::services::common::ApiError;

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let mut users = storage
        .list_users(query.role)
        .await
        .map_err(ApiError::from)?;
    users.sort_by_key(|u| u.id);

    let response = PaginatedResponse::paginate(users, &query.pagination);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "User list retrieved successfully",
    )))
}
