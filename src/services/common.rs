//! 服务层公共部分：错误响应、依赖获取与课程访问控制

use std::fmt;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use tracing::error;

use crate::ai::AiClient;
use crate::errors::AssessError;
use crate::middlewares::RequireJWT;
use crate::models::courses::entities::Course;
use crate::models::enrollments::requests::EnrollmentListQuery;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 处理函数返回的业务错误，渲染为统一的 JSON 包装
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, code, message)
    }

    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    pub fn conflict(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            message,
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?}): {}", self.status, self.code, self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status)
            .json(ApiResponse::<()>::error_empty(self.code, self.message.clone()))
    }
}

impl From<AssessError> for ApiError {
    fn from(err: AssessError) -> Self {
        let message = err.message().to_string();
        match err {
            AssessError::Validation(_) => {
                Self::bad_request(ErrorCode::ValidationFailed, message)
            }
            AssessError::NotFound(_) => Self::not_found(ErrorCode::NotFound, message),
            AssessError::Conflict(_) => Self::conflict(ErrorCode::Conflict, message),
            AssessError::Authentication(_) => Self::unauthorized(message),
            AssessError::Authorization(_) => Self::forbidden(ErrorCode::Forbidden, message),
            AssessError::AiProviderNotConfigured(_) => {
                Self::bad_request(ErrorCode::AiNotConfigured, message)
            }
            AssessError::AiProvider(_) | AssessError::AiResponse(_) => {
                error!("AI request failed: {}", err);
                Self::new(StatusCode::BAD_GATEWAY, ErrorCode::AiRequestFailed, message)
            }
            AssessError::Export(_) => {
                error!("Export failed: {}", err);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::ExportFailed,
                    message,
                )
            }
            _ => {
                error!("Internal error: {}", err);
                Self::internal("Internal server error")
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// 从 app_data 获取存储
pub(crate) fn app_storage(request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage is not registered in app data");
            ApiError::internal("Storage unavailable")
        })
}

/// 从 app_data 获取 AI 客户端
pub(crate) fn app_ai_client(request: &HttpRequest) -> ApiResult<Arc<dyn AiClient>> {
    request
        .app_data::<web::Data<Arc<dyn AiClient>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("AI client is not registered in app data");
            ApiError::internal("AI client unavailable")
        })
}

/// 当前登录用户（由 RequireJWT 放入请求扩展）
pub(crate) fn current_user(request: &HttpRequest) -> ApiResult<User> {
    RequireJWT::extract_user_claims(request)
        .ok_or_else(|| ApiError::unauthorized("Unauthorized: missing user"))
}

/// 管理员或课程的授课教师
pub fn can_manage_course(user: &User, course: &Course) -> bool {
    user.role == UserRole::Admin || course.instructor_id == user.id
}

pub async fn is_enrolled(storage: &dyn Storage, course_id: i64, student_id: i64) -> ApiResult<bool> {
    let enrollments = storage
        .list_enrollments(EnrollmentListQuery {
            course_id: Some(course_id),
            student_id: Some(student_id),
        })
        .await?;
    Ok(!enrollments.is_empty())
}

pub async fn load_course(storage: &dyn Storage, course_id: i64) -> ApiResult<Course> {
    storage
        .get_course_by_id(course_id)
        .await?
        .ok_or_else(|| ApiError::not_found(ErrorCode::CourseNotFound, "Course not found"))
}

/// 加载课程并确认当前用户可以管理
pub async fn load_managed_course(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
) -> ApiResult<Course> {
    let course = load_course(storage, course_id).await?;
    if !can_manage_course(user, &course) {
        return Err(ApiError::forbidden(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to manage this course",
        ));
    }
    Ok(course)
}

/// 加载课程并确认当前用户可以查看：管理者或已选课的学生
pub async fn load_visible_course(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
) -> ApiResult<Course> {
    let course = load_course(storage, course_id).await?;
    if can_manage_course(user, &course) {
        return Ok(course);
    }
    if user.role == UserRole::Student && is_enrolled(storage, course_id, user.id).await? {
        return Ok(course);
    }
    Err(ApiError::forbidden(
        ErrorCode::CoursePermissionDenied,
        "You do not have access to this course",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AssessError::validation("x"), StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed)]
    #[case(AssessError::not_found("x"), StatusCode::NOT_FOUND, ErrorCode::NotFound)]
    #[case(AssessError::conflict("x"), StatusCode::CONFLICT, ErrorCode::Conflict)]
    #[case(
        AssessError::ai_provider_not_configured("x"),
        StatusCode::BAD_REQUEST,
        ErrorCode::AiNotConfigured
    )]
    #[case(AssessError::ai_response("x"), StatusCode::BAD_GATEWAY, ErrorCode::AiRequestFailed)]
    #[case(
        AssessError::database_operation("x"),
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::InternalServerError
    )]
    fn test_assess_error_mapping(
        #[case] err: AssessError,
        #[case] status: StatusCode,
        #[case] code: ErrorCode,
    ) {
        let api: ApiError = err.into();
        assert_eq!(api.status, status);
        assert_eq!(api.code, code);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let api: ApiError = AssessError::database_operation("SELECT failed at row 3").into();
        assert!(!api.message.contains("SELECT"));
    }
}
