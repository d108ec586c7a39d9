use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::ai::requests::GenerateQuestionsRequest;
use crate::models::questions::requests::{
    CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::QuestionService;

static QUESTION_SERVICE: Lazy<QuestionService> = Lazy::new(QuestionService::new_lazy);

pub async fn list_questions(
    req: HttpRequest,
    query: web::Query<QuestionListQuery>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.list_questions(query.into_inner(), &req).await
}

pub async fn create_question(
    req: HttpRequest,
    question: web::Json<CreateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .create_question(question.into_inner(), &req)
        .await
}

pub async fn generate_questions(
    req: HttpRequest,
    generate_request: web::Json<GenerateQuestionsRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .generate_questions(generate_request.into_inner(), &req)
        .await
}

pub async fn get_question(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.get_question(path.into_inner(), &req).await
}

pub async fn update_question(
    req: HttpRequest,
    path: web::Path<i64>,
    update: web::Json<UpdateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .update_question(path.into_inner(), update.into_inner(), &req)
        .await
}

pub async fn delete_question(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.delete_question(path.into_inner(), &req).await
}

// 配置路由；题库仅教师和管理员可访问
pub fn configure_question_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/questions")
            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_questions))
                    .route(web::post().to(create_question)),
            )
            .service(web::resource("/generate").route(web::post().to(generate_questions)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_question))
                    .route(web::put().to(update_question))
                    .route(web::delete().to(delete_question)),
            ),
    );
}
