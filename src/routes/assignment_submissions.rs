use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignment_submissions::requests::GradeAssignmentRequest;
use crate::models::users::entities::UserRole;
use crate::services::AssignmentSubmissionService;

static ASSIGNMENT_SUBMISSION_SERVICE: Lazy<AssignmentSubmissionService> =
    Lazy::new(AssignmentSubmissionService::new_lazy);

pub async fn get_submission(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SUBMISSION_SERVICE
        .get_submission(path.into_inner(), &req)
        .await
}

pub async fn grade(
    req: HttpRequest,
    path: web::Path<i64>,
    grade_request: web::Json<GradeAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SUBMISSION_SERVICE
        .grade(path.into_inner(), grade_request.into_inner(), &req)
        .await
}

pub async fn ai_grade(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SUBMISSION_SERVICE
        .ai_grade(path.into_inner(), &req)
        .await
}

pub async fn ai_detect(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SUBMISSION_SERVICE
        .ai_detect(path.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_assignment_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignment-submissions")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/{id}").route(web::get().to(get_submission)))
            .service(
                web::scope("/{id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles()))
                    .route("/grade", web::post().to(grade))
                    .route("/ai-grade", web::post().to(ai_grade))
                    .route("/ai-detect", web::post().to(ai_detect)),
            ),
    );
}
