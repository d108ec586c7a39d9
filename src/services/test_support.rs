//! 服务层单元测试的数据准备

use crate::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};
use crate::models::courses::{entities::Course, requests::CreateCourseRequest};
use crate::models::enrollments::requests::CreateEnrollmentRequest;
use crate::models::questions::{
    entities::{Question, QuestionType},
    requests::CreateQuestionRequest,
};
use crate::models::quizzes::{
    entities::{PublishStatus, Quiz},
    requests::{CreateQuizQuestionRequest, CreateQuizRequest},
};
use crate::models::users::{
    entities::{User, UserRole},
    requests::CreateUserRequest,
};
use crate::storage::Storage;

pub async fn seed_user(storage: &dyn Storage, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@school.edu"),
            password: "hash".to_string(),
            role: Some(role),
            name: None,
            avatar_url: None,
        })
        .await
        .unwrap()
}

pub async fn seed_course(storage: &dyn Storage, instructor: &User, title: &str) -> Course {
    storage
        .create_course(CreateCourseRequest {
            title: title.to_string(),
            description: None,
            code: None,
            instructor_id: instructor.id,
        })
        .await
        .unwrap()
}

pub async fn seed_enrollment(storage: &dyn Storage, course: &Course, student: &User) {
    storage
        .create_enrollment(CreateEnrollmentRequest {
            course_id: course.id,
            student_id: student.id,
        })
        .await
        .unwrap();
}

pub async fn seed_quiz(storage: &dyn Storage, course: &Course, max_attempts: i32) -> Quiz {
    storage
        .create_quiz(CreateQuizRequest {
            course_id: course.id,
            title: "Checkpoint".to_string(),
            description: None,
            time_limit: None,
            passing_score: None,
            randomize_questions: None,
            randomize_options: None,
            show_results: None,
            proctored: None,
            status: Some(PublishStatus::Published),
            max_attempts: Some(max_attempts),
            due_date: None,
            public_required_fields: None,
        })
        .await
        .unwrap()
}

/// 创建题目并追加到测验末尾
pub async fn seed_quiz_question(
    storage: &dyn Storage,
    quiz: &Quiz,
    instructor: &User,
    question_type: QuestionType,
    correct_answer: Option<&str>,
    points: i32,
) -> Question {
    let question = storage
        .create_question(CreateQuestionRequest {
            instructor_id: instructor.id,
            course_id: Some(quiz.course_id),
            question_type,
            question_text: "Sample question".to_string(),
            options: None,
            correct_answer: correct_answer.map(str::to_string),
            points: Some(points),
            difficulty: None,
            explanation: Some("Because".to_string()),
            tags: None,
            ai_generated: None,
        })
        .await
        .unwrap();
    storage
        .add_quiz_question(
            quiz.id,
            CreateQuizQuestionRequest {
                question_id: question.id,
                order_index: None,
                points: None,
            },
        )
        .await
        .unwrap();
    question
}

pub async fn seed_assignment(storage: &dyn Storage, course: &Course, max_score: f64) -> Assignment {
    storage
        .create_assignment(CreateAssignmentRequest {
            course_id: course.id,
            title: "Essay".to_string(),
            description: None,
            instructions: Some("Write about rivers".to_string()),
            due_date: None,
            max_score: Some(max_score),
            rubric: None,
            allow_late_submission: None,
            ai_grading_enabled: None,
            status: Some(PublishStatus::Published),
        })
        .await
        .unwrap()
}
