use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest};
use crate::models::users::entities::UserRole;
use crate::services::{CourseService, GradebookService};

static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);
static GRADEBOOK_SERVICE: Lazy<GradebookService> = Lazy::new(GradebookService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListQuery>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn create_course(
    req: HttpRequest,
    course: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_course(course.into_inner(), &req).await
}

pub async fn get_course(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(path.into_inner(), &req).await
}

pub async fn update_course(
    req: HttpRequest,
    path: web::Path<i64>,
    update: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(path.into_inner(), update.into_inner(), &req)
        .await
}

pub async fn delete_course(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(path.into_inner(), &req).await
}

pub async fn get_gradebook(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    GRADEBOOK_SERVICE.get(path.into_inner(), &req).await
}

pub async fn export_gradebook(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    GRADEBOOK_SERVICE.export(path.into_inner(), &req).await
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列出课程 - 业务层按角色过滤
                    .route(web::get().to(list_courses))
                    .route(
                        web::post()
                            .to(create_course)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_course))
                    .route(
                        web::put()
                            .to(update_course)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_course)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/gradebook")
                    .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles()))
                    .route(web::get().to(get_gradebook)),
            )
            .service(
                web::resource("/{id}/gradebook/export")
                    .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles()))
                    .route(web::get().to(export_gradebook)),
            ),
    );
}
