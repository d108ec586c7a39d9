use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::lectures::requests::{
    CreateLectureRequest, LectureListQuery, UpdateLectureRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::LectureService;

static LECTURE_SERVICE: Lazy<LectureService> = Lazy::new(LectureService::new_lazy);

pub async fn list_lectures(
    req: HttpRequest,
    query: web::Query<LectureListQuery>,
) -> ActixResult<HttpResponse> {
    LECTURE_SERVICE.list_lectures(query.into_inner(), &req).await
}

pub async fn create_lecture(
    req: HttpRequest,
    lecture: web::Json<CreateLectureRequest>,
) -> ActixResult<HttpResponse> {
    LECTURE_SERVICE.create_lecture(lecture.into_inner(), &req).await
}

pub async fn get_lecture(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    LECTURE_SERVICE.get_lecture(path.into_inner(), &req).await
}

pub async fn update_lecture(
    req: HttpRequest,
    path: web::Path<i64>,
    update: web::Json<UpdateLectureRequest>,
) -> ActixResult<HttpResponse> {
    LECTURE_SERVICE
        .update_lecture(path.into_inner(), update.into_inner(), &req)
        .await
}

pub async fn delete_lecture(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    LECTURE_SERVICE.delete_lecture(path.into_inner(), &req).await
}

// 配置路由
pub fn configure_lecture_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/lectures")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_lectures))
                    .route(
                        web::post()
                            .to(create_lecture)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_lecture))
                    .route(
                        web::put()
                            .to(update_lecture)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_lecture)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            ),
    );
}
