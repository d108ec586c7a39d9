use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::proctoring::requests::{CreateViolationRequest, UpdateViolationRequest};
use crate::models::quiz_submissions::requests::{GradeQuizSubmissionRequest, SubmitQuizRequest};
use crate::models::users::entities::UserRole;
use crate::services::{ProctoringService, QuizSubmissionService};

static QUIZ_SUBMISSION_SERVICE: Lazy<QuizSubmissionService> =
    Lazy::new(QuizSubmissionService::new_lazy);
static PROCTORING_SERVICE: Lazy<ProctoringService> = Lazy::new(ProctoringService::new_lazy);

pub async fn get_submission(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUIZ_SUBMISSION_SERVICE
        .get_submission(path.into_inner(), &req)
        .await
}

pub async fn submit(
    req: HttpRequest,
    path: web::Path<i64>,
    submit_request: web::Json<SubmitQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SUBMISSION_SERVICE
        .submit(path.into_inner(), submit_request.into_inner(), &req)
        .await
}

pub async fn grade(
    req: HttpRequest,
    path: web::Path<i64>,
    grade_request: web::Json<GradeQuizSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SUBMISSION_SERVICE
        .grade(path.into_inner(), grade_request.into_inner(), &req)
        .await
}

pub async fn log_violation(
    req: HttpRequest,
    path: web::Path<i64>,
    violation: web::Json<CreateViolationRequest>,
) -> ActixResult<HttpResponse> {
    PROCTORING_SERVICE
        .log_violation(path.into_inner(), violation.into_inner(), &req)
        .await
}

pub async fn list_violations(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    PROCTORING_SERVICE
        .list_violations(path.into_inner(), &req)
        .await
}

pub async fn review_violation(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    update: web::Json<UpdateViolationRequest>,
) -> ActixResult<HttpResponse> {
    let (submission_id, violation_id) = path.into_inner();
    PROCTORING_SERVICE
        .review_violation(submission_id, violation_id, update.into_inner(), &req)
        .await
}

// 配置路由；监考违规记录挂在测验提交之下
pub fn configure_quiz_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/quiz-submissions")
            .wrap(middlewares::RequireJWT)
            // 查看提交 - 提交者本人或课程管理者
            .service(web::resource("/{id}").route(web::get().to(get_submission)))
            .service(web::resource("/{id}/submit").route(web::post().to(submit)))
            .service(
                web::resource("/{id}/grade")
                    .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles()))
                    .route(web::post().to(grade)),
            )
            .service(
                web::resource("/{id}/violations")
                    // 学生在作答过程中上报
                    .route(web::post().to(log_violation))
                    .route(
                        web::get()
                            .to(list_violations)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/violations/{violation_id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles()))
                    .route(web::put().to(review_violation)),
            ),
    );
}
