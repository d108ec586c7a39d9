//! 请求参数解析失败时统一返回 JSON 包装的 400 响应

use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(kind: &str, detail: String) -> Error {
    debug!("Rejected {} parameters: {}", kind, detail);
    let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid {kind}: {detail}"),
    ));
    InternalError::from_response(detail, response).into()
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    bad_request("JSON body", err.to_string())
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    bad_request("query parameters", err.to_string())
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    bad_request("path parameters", err.to_string())
}
