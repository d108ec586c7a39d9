pub mod assignment_submissions;
pub mod assignments;
pub mod auth;
pub mod chat;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod lectures;
pub mod public_quiz;
pub mod questions;
pub mod quiz_submissions;
pub mod quizzes;
pub mod users;

pub use assignment_submissions::configure_assignment_submission_routes;
pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use chat::configure_chat_routes;
pub use courses::configure_course_routes;
pub use dashboard::configure_dashboard_routes;
pub use enrollments::configure_enrollment_routes;
pub use lectures::configure_lecture_routes;
pub use public_quiz::configure_public_quiz_routes;
pub use questions::configure_question_routes;
pub use quiz_submissions::configure_quiz_submission_routes;
pub use quizzes::configure_quiz_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由（main 与集成测试共用）
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_course_routes)
        .configure(configure_lecture_routes)
        .configure(configure_enrollment_routes)
        .configure(configure_question_routes)
        .configure(configure_quiz_routes)
        .configure(configure_quiz_submission_routes)
        .configure(configure_assignment_routes)
        .configure(configure_assignment_submission_routes)
        .configure(configure_public_quiz_routes)
        .configure(configure_chat_routes)
        .configure(configure_dashboard_routes);
}
