use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignment_submissions::requests::SubmitAssignmentRequest;
use crate::models::assignments::requests::{
    AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, AssignmentSubmissionService};

static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static ASSIGNMENT_SUBMISSION_SERVICE: Lazy<AssignmentSubmissionService> =
    Lazy::new(AssignmentSubmissionService::new_lazy);

pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AssignmentListQuery>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments(query.into_inner(), &req)
        .await
}

pub async fn create_assignment(
    req: HttpRequest,
    assignment: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(assignment.into_inner(), &req)
        .await
}

pub async fn get_assignment(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .get_assignment(path.into_inner(), &req)
        .await
}

pub async fn update_assignment(
    req: HttpRequest,
    path: web::Path<i64>,
    update: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(path.into_inner(), update.into_inner(), &req)
        .await
}

pub async fn delete_assignment(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_assignment(path.into_inner(), &req)
        .await
}

pub async fn list_submissions(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SUBMISSION_SERVICE
        .list_for_assignment(path.into_inner(), &req)
        .await
}

pub async fn submit(
    req: HttpRequest,
    path: web::Path<i64>,
    submit_request: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SUBMISSION_SERVICE
        .submit(path.into_inner(), submit_request.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_assignments))
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_assignment))
                    .route(
                        web::put()
                            .to(update_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/submissions")
                    .route(
                        web::get()
                            .to(list_submissions)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    )
                    // 学生提交或重新提交
                    .route(web::post().to(submit)),
            ),
    );
}
