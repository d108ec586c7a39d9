//! 预导入模块，方便使用

pub use super::assignment_submissions::{
    ActiveModel as AssignmentSubmissionActiveModel, Entity as AssignmentSubmissions,
    Model as AssignmentSubmissionModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::chat_commands::{
    ActiveModel as ChatCommandActiveModel, Entity as ChatCommands, Model as ChatCommandModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::lectures::{
    ActiveModel as LectureActiveModel, Entity as Lectures, Model as LectureModel,
};
pub use super::proctoring_violations::{
    ActiveModel as ViolationActiveModel, Entity as ProctoringViolations, Model as ViolationModel,
};
pub use super::public_quiz_submissions::{
    ActiveModel as PublicSubmissionActiveModel, Entity as PublicQuizSubmissions,
    Model as PublicSubmissionModel,
};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::quiz_questions::{
    ActiveModel as QuizQuestionActiveModel, Entity as QuizQuestions, Model as QuizQuestionModel,
};
pub use super::quiz_submissions::{
    ActiveModel as QuizSubmissionActiveModel, Entity as QuizSubmissions,
    Model as QuizSubmissionModel,
};
pub use super::quizzes::{ActiveModel as QuizActiveModel, Entity as Quizzes, Model as QuizModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
