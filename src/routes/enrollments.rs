use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::requests::{CreateEnrollmentRequest, EnrollmentListQuery};
use crate::services::EnrollmentService;

static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListQuery>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_enrollments(query.into_inner(), &req)
        .await
}

pub async fn create_enrollment(
    req: HttpRequest,
    enrollment: web::Json<CreateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .create_enrollment(enrollment.into_inner(), &req)
        .await
}

pub async fn delete_enrollment(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .delete_enrollment(path.into_inner(), &req)
        .await
}

// 配置路由；学生只能为自己选课，权限在业务层检查
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_enrollments))
                    .route(web::post().to(create_enrollment)),
            )
            .service(web::resource("/{id}").route(web::delete().to(delete_enrollment))),
    );
}
