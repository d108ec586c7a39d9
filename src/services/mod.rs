pub mod assignment_submissions;
pub mod assignments;
pub mod auth;
pub mod chat;
pub mod common;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod gradebook;
pub mod lectures;
pub mod proctoring;
pub mod public_quiz;
pub mod questions;
pub mod quiz_submissions;
pub mod quizzes;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

pub use assignment_submissions::AssignmentSubmissionService;
pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use chat::ChatService;
pub use courses::CourseService;
pub use dashboard::DashboardService;
pub use enrollments::EnrollmentService;
pub use gradebook::GradebookService;
pub use lectures::LectureService;
pub use proctoring::ProctoringService;
pub use public_quiz::PublicQuizService;
pub use questions::QuestionService;
pub use quiz_submissions::QuizSubmissionService;
pub use quizzes::QuizService;
pub use users::UserService;
