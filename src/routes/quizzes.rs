use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::quizzes::requests::{
    CreateQuizQuestionRequest, CreateQuizRequest, GeneratePublicLinkRequest, QuizListQuery,
    UpdateQuizRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{QuizService, QuizSubmissionService};

static QUIZ_SERVICE: Lazy<QuizService> = Lazy::new(QuizService::new_lazy);
static QUIZ_SUBMISSION_SERVICE: Lazy<QuizSubmissionService> =
    Lazy::new(QuizSubmissionService::new_lazy);

pub async fn list_quizzes(
    req: HttpRequest,
    query: web::Query<QuizListQuery>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.list_quizzes(query.into_inner(), &req).await
}

pub async fn create_quiz(
    req: HttpRequest,
    quiz: web::Json<CreateQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.create_quiz(quiz.into_inner(), &req).await
}

pub async fn get_quiz(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.get_quiz(path.into_inner(), &req).await
}

pub async fn update_quiz(
    req: HttpRequest,
    path: web::Path<i64>,
    update: web::Json<UpdateQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .update_quiz(path.into_inner(), update.into_inner(), &req)
        .await
}

pub async fn delete_quiz(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.delete_quiz(path.into_inner(), &req).await
}

pub async fn list_quiz_questions(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.list_quiz_questions(path.into_inner(), &req).await
}

pub async fn add_quiz_question(
    req: HttpRequest,
    path: web::Path<i64>,
    link: web::Json<CreateQuizQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .add_quiz_question(path.into_inner(), link.into_inner(), &req)
        .await
}

pub async fn remove_quiz_question(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (quiz_id, question_id) = path.into_inner();
    QUIZ_SERVICE
        .remove_quiz_question(quiz_id, question_id, &req)
        .await
}

pub async fn generate_public_link(
    req: HttpRequest,
    path: web::Path<i64>,
    link_request: web::Json<GeneratePublicLinkRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .generate_public_link(path.into_inner(), link_request.into_inner(), &req)
        .await
}

pub async fn disable_public_link(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.disable_public_link(path.into_inner(), &req).await
}

pub async fn list_public_submissions(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .list_public_submissions(path.into_inner(), &req)
        .await
}

pub async fn start_attempt(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUIZ_SUBMISSION_SERVICE
        .start_attempt(path.into_inner(), &req)
        .await
}

pub async fn list_submissions(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    QUIZ_SUBMISSION_SERVICE
        .list_for_quiz(path.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_quiz_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/quizzes")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列出测验 - 学生只能看到已发布的测验
                    .route(web::get().to(list_quizzes))
                    .route(
                        web::post()
                            .to(create_quiz)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_quiz))
                    .route(
                        web::put()
                            .to(update_quiz)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_quiz)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/questions")
                    // 答案是否可见由业务层决定
                    .route(web::get().to(list_quiz_questions))
                    .route(
                        web::post()
                            .to(add_quiz_question)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/questions/{question_id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles()))
                    .route(web::delete().to(remove_quiz_question)),
            )
            .service(
                web::resource("/{id}/public-link")
                    .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles()))
                    .route(web::post().to(generate_public_link))
                    .route(web::delete().to(disable_public_link)),
            )
            .service(
                web::resource("/{id}/public-submissions")
                    .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles()))
                    .route(web::get().to(list_public_submissions)),
            )
            // 开始作答 - 业务层检查选课与次数限制
            .service(web::resource("/{id}/attempts").route(web::post().to(start_attempt)))
            .service(
                web::resource("/{id}/submissions")
                    .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles()))
                    .route(web::get().to(list_submissions)),
            ),
    );
}
