//! 内存存储实现
//!
//! 数据库未配置时的后备存储，以及测试使用的存储。
//! 并发写入为后写覆盖，过滤为线性扫描。

mod table;

use async_trait::async_trait;

use self::table::Table;
use crate::errors::{AssessError, Result};
use crate::models::{
    assignment_submissions::{
        entities::AssignmentSubmission,
        requests::{
            AssignmentSubmissionListQuery, CreateAssignmentSubmissionRequest,
            UpdateAssignmentSubmissionRequest,
        },
    },
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    chat::{entities::ChatCommand, requests::CreateChatCommandRequest},
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
    },
    enrollments::{
        entities::Enrollment,
        requests::{CreateEnrollmentRequest, EnrollmentListQuery},
    },
    lectures::{
        entities::Lecture,
        requests::{CreateLectureRequest, LectureListQuery, UpdateLectureRequest},
    },
    proctoring::{
        entities::ProctoringViolation,
        requests::{CreateViolationRequest, UpdateViolationRequest},
    },
    public_quiz::{entities::PublicQuizSubmission, requests::CreatePublicSubmissionRequest},
    questions::{
        entities::Question,
        requests::{CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest},
    },
    quiz_submissions::{
        entities::QuizSubmission,
        requests::{
            CreateQuizSubmissionRequest, QuizSubmissionListQuery, UpdateQuizSubmissionRequest,
        },
    },
    quizzes::{
        entities::{PublicAccess, Quiz, QuizQuestion},
        requests::{CreateQuizQuestionRequest, CreateQuizRequest, QuizListQuery, UpdateQuizRequest},
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateAiSettingsRequest, UpdateUserRequest},
    },
};
use crate::storage::Storage;
use crate::utils::time::now;

/// 内存存储
pub struct MemoryStorage {
    users: Table<User>,
    courses: Table<Course>,
    lectures: Table<Lecture>,
    questions: Table<Question>,
    quizzes: Table<Quiz>,
    quiz_questions: Table<QuizQuestion>,
    assignments: Table<Assignment>,
    enrollments: Table<Enrollment>,
    quiz_submissions: Table<QuizSubmission>,
    assignment_submissions: Table<AssignmentSubmission>,
    violations: Table<ProctoringViolation>,
    public_submissions: Table<PublicQuizSubmission>,
    chat_commands: Table<ChatCommand>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            users: Table::new(),
            courses: Table::new(),
            lectures: Table::new(),
            questions: Table::new(),
            quizzes: Table::new(),
            quiz_questions: Table::new(),
            assignments: Table::new(),
            enrollments: Table::new(),
            quiz_submissions: Table::new(),
            assignment_submissions: Table::new(),
            violations: Table::new(),
            public_submissions: Table::new(),
            chat_commands: Table::new(),
        }
    }
}

fn filter_eq<T: PartialEq>(filter: Option<T>, value: T) -> bool {
    filter.is_none_or(|f| f == value)
}

#[async_trait]
impl Storage for MemoryStorage {
    // 用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        Ok(self
            .users
            .insert_with(|id| User::from_request(id, user, now())))
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.get(id))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.find(|u| u.username == username))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.find(|u| u.email == email))
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .find(|u| u.username == identifier || u.email == identifier))
    }

    async fn list_users(&self, role: Option<UserRole>) -> Result<Vec<User>> {
        Ok(self.users.filter(|u| filter_eq(role, u.role)))
    }

    async fn count_users(&self) -> Result<u64> {
        Ok(self.users.count() as u64)
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.users.update(id, |u| {
            u.apply_update(update, now());
            Ok(())
        })
    }

    async fn update_user_ai_settings(
        &self,
        id: i64,
        update: UpdateAiSettingsRequest,
    ) -> Result<Option<User>> {
        self.users.update(id, |u| {
            u.apply_ai_settings(update, now());
            Ok(())
        })
    }

    // 课程
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        Ok(self
            .courses
            .insert_with(|id| Course::from_request(id, course, now())))
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        Ok(self.courses.get(id))
    }

    async fn list_courses(&self, query: CourseListQuery) -> Result<Vec<Course>> {
        Ok(self
            .courses
            .filter(|c| filter_eq(query.instructor_id, c.instructor_id)))
    }

    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>> {
        self.courses.update(id, |c| {
            c.apply_update(update, now());
            Ok(())
        })
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        let removed = self.courses.remove(id);
        self.enrollments.retain(|e| e.course_id != id);
        Ok(removed)
    }

    // 讲义
    async fn create_lecture(&self, lecture: CreateLectureRequest) -> Result<Lecture> {
        Ok(self
            .lectures
            .insert_with(|id| Lecture::from_request(id, lecture, now())))
    }

    async fn get_lecture_by_id(&self, id: i64) -> Result<Option<Lecture>> {
        Ok(self.lectures.get(id))
    }

    async fn list_lectures(&self, query: LectureListQuery) -> Result<Vec<Lecture>> {
        Ok(self
            .lectures
            .filter(|l| filter_eq(query.course_id, l.course_id)))
    }

    async fn update_lecture(
        &self,
        id: i64,
        update: UpdateLectureRequest,
    ) -> Result<Option<Lecture>> {
        self.lectures.update(id, |l| {
            l.apply_update(update, now());
            Ok(())
        })
    }

    async fn delete_lecture(&self, id: i64) -> Result<bool> {
        Ok(self.lectures.remove(id))
    }

    // 题库
    async fn create_question(&self, question: CreateQuestionRequest) -> Result<Question> {
        Ok(self
            .questions
            .insert_with(|id| Question::from_request(id, question, now())))
    }

    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>> {
        Ok(self.questions.get(id))
    }

    async fn list_questions(&self, query: QuestionListQuery) -> Result<Vec<Question>> {
        Ok(self.questions.filter(|q| {
            filter_eq(query.instructor_id, q.instructor_id)
                && query.course_id.is_none_or(|c| q.course_id == Some(c))
        }))
    }

    async fn update_question(
        &self,
        id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<Question>> {
        self.questions.update(id, |q| {
            q.apply_update(update, now());
            Ok(())
        })
    }

    async fn delete_question(&self, id: i64) -> Result<bool> {
        let removed = self.questions.remove(id);
        self.quiz_questions.retain(|link| link.question_id != id);
        Ok(removed)
    }

    // 测验
    async fn create_quiz(&self, quiz: CreateQuizRequest) -> Result<Quiz> {
        Ok(self
            .quizzes
            .insert_with(|id| Quiz::from_request(id, quiz, now())))
    }

    async fn get_quiz_by_id(&self, id: i64) -> Result<Option<Quiz>> {
        Ok(self.quizzes.get(id))
    }

    async fn get_quiz_by_public_token(&self, token: &str) -> Result<Option<Quiz>> {
        Ok(self
            .quizzes
            .find(|q| q.public_token.as_deref() == Some(token)))
    }

    async fn list_quizzes(&self, query: QuizListQuery) -> Result<Vec<Quiz>> {
        Ok(self.quizzes.filter(|q| filter_eq(query.course_id, q.course_id)))
    }

    async fn update_quiz(&self, id: i64, update: UpdateQuizRequest) -> Result<Option<Quiz>> {
        self.quizzes.update(id, |q| {
            q.apply_update(update, now());
            Ok(())
        })
    }

    async fn set_quiz_public_access(
        &self,
        id: i64,
        access: PublicAccess,
    ) -> Result<Option<Quiz>> {
        self.quizzes.update(id, |q| {
            q.apply_public_access(access, now());
            Ok(())
        })
    }

    async fn delete_quiz(&self, id: i64) -> Result<bool> {
        let removed = self.quizzes.remove(id);
        self.quiz_questions.retain(|link| link.quiz_id != id);
        Ok(removed)
    }

    // 测验题目关联
    async fn add_quiz_question(
        &self,
        quiz_id: i64,
        link: CreateQuizQuestionRequest,
    ) -> Result<QuizQuestion> {
        let existing = self.quiz_questions.filter(|l| l.quiz_id == quiz_id);
        let order_index = match link.order_index {
            Some(index) => {
                if existing.iter().any(|l| l.order_index == index) {
                    return Err(AssessError::conflict(format!(
                        "Order index {index} is already used in quiz {quiz_id}"
                    )));
                }
                index
            }
            None => existing
                .iter()
                .map(|l| l.order_index + 1)
                .max()
                .unwrap_or(0),
        };
        Ok(self
            .quiz_questions
            .insert_with(|id| QuizQuestion::from_request(id, quiz_id, link, order_index)))
    }

    async fn list_quiz_questions(&self, quiz_id: i64) -> Result<Vec<QuizQuestion>> {
        let mut links = self.quiz_questions.filter(|l| l.quiz_id == quiz_id);
        links.sort_by_key(|l| (l.order_index, l.id));
        Ok(links)
    }

    async fn remove_quiz_question(&self, quiz_id: i64, question_id: i64) -> Result<bool> {
        let targets = self
            .quiz_questions
            .filter(|l| l.quiz_id == quiz_id && l.question_id == question_id);
        let mut removed = false;
        for link in targets {
            removed |= self.quiz_questions.remove(link.id);
        }
        Ok(removed)
    }

    // 作业
    async fn create_assignment(&self, assignment: CreateAssignmentRequest) -> Result<Assignment> {
        Ok(self
            .assignments
            .insert_with(|id| Assignment::from_request(id, assignment, now())))
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        Ok(self.assignments.get(id))
    }

    async fn list_assignments(&self, query: AssignmentListQuery) -> Result<Vec<Assignment>> {
        Ok(self
            .assignments
            .filter(|a| filter_eq(query.course_id, a.course_id)))
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.assignments.update(id, |a| {
            a.apply_update(update, now());
            Ok(())
        })
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        Ok(self.assignments.remove(id))
    }

    // 选课
    async fn create_enrollment(&self, enrollment: CreateEnrollmentRequest) -> Result<Enrollment> {
        Ok(self
            .enrollments
            .insert_with(|id| Enrollment::from_request(id, enrollment, now())))
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        Ok(self.enrollments.get(id))
    }

    async fn list_enrollments(&self, query: EnrollmentListQuery) -> Result<Vec<Enrollment>> {
        Ok(self.enrollments.filter(|e| {
            filter_eq(query.course_id, e.course_id) && filter_eq(query.student_id, e.student_id)
        }))
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool> {
        Ok(self.enrollments.remove(id))
    }

    // 测验提交
    async fn create_quiz_submission(
        &self,
        submission: CreateQuizSubmissionRequest,
    ) -> Result<QuizSubmission> {
        Ok(self
            .quiz_submissions
            .insert_with(|id| QuizSubmission::from_request(id, submission, now())))
    }

    async fn get_quiz_submission_by_id(&self, id: i64) -> Result<Option<QuizSubmission>> {
        Ok(self.quiz_submissions.get(id))
    }

    async fn list_quiz_submissions(
        &self,
        query: QuizSubmissionListQuery,
    ) -> Result<Vec<QuizSubmission>> {
        Ok(self.quiz_submissions.filter(|s| {
            filter_eq(query.quiz_id, s.quiz_id) && filter_eq(query.student_id, s.student_id)
        }))
    }

    async fn update_quiz_submission(
        &self,
        id: i64,
        update: UpdateQuizSubmissionRequest,
    ) -> Result<Option<QuizSubmission>> {
        self.quiz_submissions
            .update(id, |s| s.apply_update(update, now()))
    }

    // 作业提交
    async fn create_assignment_submission(
        &self,
        submission: CreateAssignmentSubmissionRequest,
    ) -> Result<AssignmentSubmission> {
        Ok(self
            .assignment_submissions
            .insert_with(|id| AssignmentSubmission::from_request(id, submission, now())))
    }

    async fn get_assignment_submission_by_id(
        &self,
        id: i64,
    ) -> Result<Option<AssignmentSubmission>> {
        Ok(self.assignment_submissions.get(id))
    }

    async fn list_assignment_submissions(
        &self,
        query: AssignmentSubmissionListQuery,
    ) -> Result<Vec<AssignmentSubmission>> {
        Ok(self.assignment_submissions.filter(|s| {
            filter_eq(query.assignment_id, s.assignment_id)
                && filter_eq(query.student_id, s.student_id)
        }))
    }

    async fn update_assignment_submission(
        &self,
        id: i64,
        update: UpdateAssignmentSubmissionRequest,
    ) -> Result<Option<AssignmentSubmission>> {
        self.assignment_submissions
            .update(id, |s| s.apply_update(update, now()))
    }

    // 监考违规
    async fn create_violation(
        &self,
        violation: CreateViolationRequest,
    ) -> Result<ProctoringViolation> {
        Ok(self
            .violations
            .insert_with(|id| ProctoringViolation::from_request(id, violation, now())))
    }

    async fn list_violations(
        &self,
        submission_id: Option<i64>,
    ) -> Result<Vec<ProctoringViolation>> {
        Ok(self
            .violations
            .filter(|v| filter_eq(submission_id, v.submission_id)))
    }

    async fn update_violation(
        &self,
        id: i64,
        update: UpdateViolationRequest,
    ) -> Result<Option<ProctoringViolation>> {
        self.violations.update(id, |v| {
            v.apply_update(update);
            Ok(())
        })
    }

    // 公开测验提交
    async fn create_public_submission(
        &self,
        submission: CreatePublicSubmissionRequest,
    ) -> Result<PublicQuizSubmission> {
        Ok(self
            .public_submissions
            .insert_with(|id| PublicQuizSubmission::from_request(id, submission, now())))
    }

    async fn list_public_submissions(
        &self,
        quiz_id: Option<i64>,
    ) -> Result<Vec<PublicQuizSubmission>> {
        Ok(self
            .public_submissions
            .filter(|s| filter_eq(quiz_id, s.quiz_id)))
    }

    // 聊天记录
    async fn create_chat_command(&self, command: CreateChatCommandRequest) -> Result<ChatCommand> {
        Ok(self
            .chat_commands
            .insert_with(|id| ChatCommand::from_request(id, command, now())))
    }

    async fn list_chat_commands(&self, user_id: Option<i64>) -> Result<Vec<ChatCommand>> {
        Ok(self
            .chat_commands
            .filter(|c| filter_eq(user_id, c.user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::SubmissionStatus;
    use crate::models::quizzes::entities::{PublicPermission, PublishStatus};

    fn quiz_request(course_id: i64) -> CreateQuizRequest {
        serde_json::from_value(serde_json::json!({ "courseId": course_id, "title": "Quiz" }))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get_returns_defaults() {
        let storage = MemoryStorage::new();
        let created = storage.create_quiz(quiz_request(1)).await.unwrap();
        let fetched = storage.get_quiz_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.status, PublishStatus::Draft);
        assert_eq!(fetched.passing_score, 60);
    }

    #[tokio::test]
    async fn test_update_missing_is_none_and_no_write() {
        let storage = MemoryStorage::new();
        let result = storage
            .update_quiz(
                42,
                UpdateQuizRequest {
                    title: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(storage
            .list_quizzes(QuizListQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let storage = MemoryStorage::new();
        let quiz = storage.create_quiz(quiz_request(1)).await.unwrap();
        assert!(storage.delete_quiz(quiz.id).await.unwrap());
        assert!(!storage.delete_quiz(quiz.id).await.unwrap());
        assert!(storage.get_quiz_by_id(quiz.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_filters_are_optional() {
        let storage = MemoryStorage::new();
        storage.create_quiz(quiz_request(1)).await.unwrap();
        storage.create_quiz(quiz_request(2)).await.unwrap();
        let all = storage.list_quizzes(QuizListQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        let filtered = storage
            .list_quizzes(QuizListQuery { course_id: Some(2) })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].course_id, 2);
    }

    #[tokio::test]
    async fn test_quiz_questions_ordered_by_index() {
        let storage = MemoryStorage::new();
        let quiz = storage.create_quiz(quiz_request(1)).await.unwrap();
        for (question_id, order_index) in [(10, 5), (11, 1), (12, 3)] {
            storage
                .add_quiz_question(
                    quiz.id,
                    CreateQuizQuestionRequest {
                        question_id,
                        order_index: Some(order_index),
                        points: None,
                    },
                )
                .await
                .unwrap();
        }
        let appended = storage
            .add_quiz_question(
                quiz.id,
                CreateQuizQuestionRequest {
                    question_id: 13,
                    order_index: None,
                    points: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(appended.order_index, 6);

        let ids: Vec<i64> = storage
            .list_quiz_questions(quiz.id)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.question_id)
            .collect();
        assert_eq!(ids, vec![11, 12, 10, 13]);
    }

    #[tokio::test]
    async fn test_duplicate_order_index_rejected() {
        let storage = MemoryStorage::new();
        let link = |question_id| CreateQuizQuestionRequest {
            question_id,
            order_index: Some(0),
            points: None,
        };
        storage.add_quiz_question(1, link(10)).await.unwrap();
        let err = storage.add_quiz_question(1, link(11)).await.unwrap_err();
        assert_eq!(err.code(), "E006");
    }

    #[tokio::test]
    async fn test_quiz_delete_cascades_links() {
        let storage = MemoryStorage::new();
        let quiz = storage.create_quiz(quiz_request(1)).await.unwrap();
        storage
            .add_quiz_question(
                quiz.id,
                CreateQuizQuestionRequest {
                    question_id: 3,
                    order_index: None,
                    points: None,
                },
            )
            .await
            .unwrap();
        storage.delete_quiz(quiz.id).await.unwrap();
        assert!(storage.list_quiz_questions(quiz.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submission_status_never_regresses() {
        let storage = MemoryStorage::new();
        let submission = storage
            .create_quiz_submission(CreateQuizSubmissionRequest {
                quiz_id: 1,
                student_id: 2,
                answers: None,
                status: Some(SubmissionStatus::Graded),
                attempt_number: None,
            })
            .await
            .unwrap();

        let result = storage
            .update_quiz_submission(
                submission.id,
                UpdateQuizSubmissionRequest {
                    status: Some(SubmissionStatus::InProgress),
                    score: Some(1.0),
                    ..Default::default()
                },
            )
            .await;
        assert!(result.is_err());

        let stored = storage
            .get_quiz_submission_by_id(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, SubmissionStatus::Graded);
        assert_eq!(stored.score, None);
    }

    #[tokio::test]
    async fn test_public_token_lookup() {
        let storage = MemoryStorage::new();
        let quiz = storage.create_quiz(quiz_request(1)).await.unwrap();
        storage
            .set_quiz_public_access(
                quiz.id,
                PublicAccess::Enable {
                    token: "tok-1".to_string(),
                    permission: PublicPermission::View,
                    required_fields: None,
                },
            )
            .await
            .unwrap();
        assert!(storage.get_quiz_by_public_token("tok-1").await.unwrap().is_some());
        assert!(storage.get_quiz_by_public_token("tok-2").await.unwrap().is_none());
    }
}
