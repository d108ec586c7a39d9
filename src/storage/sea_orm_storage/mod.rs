//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod activity;
mod assignments;
mod courses;
mod questions;
mod quizzes;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{AssessError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AssessError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AssessError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AssessError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AssessError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AssessError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users(&self, role: Option<UserRole>) -> Result<Vec<User>> {
        self.list_users_impl(role).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn update_user_ai_settings(
        &self,
        id: i64,
        update: UpdateAiSettingsRequest,
    ) -> Result<Option<User>> {
        self.update_user_ai_settings_impl(id, update).await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn list_courses(&self, query: CourseListQuery) -> Result<Vec<Course>> {
        self.list_courses_impl(query).await
    }

    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    // 讲义模块
    async fn create_lecture(&self, lecture: CreateLectureRequest) -> Result<Lecture> {
        self.create_lecture_impl(lecture).await
    }

    async fn get_lecture_by_id(&self, id: i64) -> Result<Option<Lecture>> {
        self.get_lecture_by_id_impl(id).await
    }

    async fn list_lectures(&self, query: LectureListQuery) -> Result<Vec<Lecture>> {
        self.list_lectures_impl(query).await
    }

    async fn update_lecture(
        &self,
        id: i64,
        update: UpdateLectureRequest,
    ) -> Result<Option<Lecture>> {
        self.update_lecture_impl(id, update).await
    }

    async fn delete_lecture(&self, id: i64) -> Result<bool> {
        self.delete_lecture_impl(id).await
    }

    // 题库模块
    async fn create_question(&self, question: CreateQuestionRequest) -> Result<Question> {
        self.create_question_impl(question).await
    }

    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>> {
        self.get_question_by_id_impl(id).await
    }

    async fn list_questions(&self, query: QuestionListQuery) -> Result<Vec<Question>> {
        self.list_questions_impl(query).await
    }

    async fn update_question(
        &self,
        id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<Question>> {
        self.update_question_impl(id, update).await
    }

    async fn delete_question(&self, id: i64) -> Result<bool> {
        self.delete_question_impl(id).await
    }

    // 测验模块
    async fn create_quiz(&self, quiz: CreateQuizRequest) -> Result<Quiz> {
        self.create_quiz_impl(quiz).await
    }

    async fn get_quiz_by_id(&self, id: i64) -> Result<Option<Quiz>> {
        self.get_quiz_by_id_impl(id).await
    }

    async fn get_quiz_by_public_token(&self, token: &str) -> Result<Option<Quiz>> {
        self.get_quiz_by_public_token_impl(token).await
    }

    async fn list_quizzes(&self, query: QuizListQuery) -> Result<Vec<Quiz>> {
        self.list_quizzes_impl(query).await
    }

    async fn update_quiz(&self, id: i64, update: UpdateQuizRequest) -> Result<Option<Quiz>> {
        self.update_quiz_impl(id, update).await
    }

    async fn set_quiz_public_access(
        &self,
        id: i64,
        access: PublicAccess,
    ) -> Result<Option<Quiz>> {
        self.set_quiz_public_access_impl(id, access).await
    }

    async fn delete_quiz(&self, id: i64) -> Result<bool> {
        self.delete_quiz_impl(id).await
    }

    async fn add_quiz_question(
        &self,
        quiz_id: i64,
        link: CreateQuizQuestionRequest,
    ) -> Result<QuizQuestion> {
        self.add_quiz_question_impl(quiz_id, link).await
    }

    async fn list_quiz_questions(&self, quiz_id: i64) -> Result<Vec<QuizQuestion>> {
        self.list_quiz_questions_impl(quiz_id).await
    }

    async fn remove_quiz_question(&self, quiz_id: i64, question_id: i64) -> Result<bool> {
        self.remove_quiz_question_impl(quiz_id, question_id).await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: CreateAssignmentRequest) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments(&self, query: AssignmentListQuery) -> Result<Vec<Assignment>> {
        self.list_assignments_impl(query).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    // 选课模块
    async fn create_enrollment(&self, enrollment: CreateEnrollmentRequest) -> Result<Enrollment> {
        self.create_enrollment_impl(enrollment).await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn list_enrollments(&self, query: EnrollmentListQuery) -> Result<Vec<Enrollment>> {
        self.list_enrollments_impl(query).await
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool> {
        self.delete_enrollment_impl(id).await
    }

    // 提交模块
    async fn create_quiz_submission(
        &self,
        submission: CreateQuizSubmissionRequest,
    ) -> Result<QuizSubmission> {
        self.create_quiz_submission_impl(submission).await
    }

    async fn get_quiz_submission_by_id(&self, id: i64) -> Result<Option<QuizSubmission>> {
        self.get_quiz_submission_by_id_impl(id).await
    }

    async fn list_quiz_submissions(
        &self,
        query: QuizSubmissionListQuery,
    ) -> Result<Vec<QuizSubmission>> {
        self.list_quiz_submissions_impl(query).await
    }

    async fn update_quiz_submission(
        &self,
        id: i64,
        update: UpdateQuizSubmissionRequest,
    ) -> Result<Option<QuizSubmission>> {
        self.update_quiz_submission_impl(id, update).await
    }

    async fn create_assignment_submission(
        &self,
        submission: CreateAssignmentSubmissionRequest,
    ) -> Result<AssignmentSubmission> {
        self.create_assignment_submission_impl(submission).await
    }

    async fn get_assignment_submission_by_id(
        &self,
        id: i64,
    ) -> Result<Option<AssignmentSubmission>> {
        self.get_assignment_submission_by_id_impl(id).await
    }

    async fn list_assignment_submissions(
        &self,
        query: AssignmentSubmissionListQuery,
    ) -> Result<Vec<AssignmentSubmission>> {
        self.list_assignment_submissions_impl(query).await
    }

    async fn update_assignment_submission(
        &self,
        id: i64,
        update: UpdateAssignmentSubmissionRequest,
    ) -> Result<Option<AssignmentSubmission>> {
        self.update_assignment_submission_impl(id, update).await
    }

    // 监考模块
    async fn create_violation(
        &self,
        violation: CreateViolationRequest,
    ) -> Result<ProctoringViolation> {
        self.create_violation_impl(violation).await
    }

    async fn list_violations(
        &self,
        submission_id: Option<i64>,
    ) -> Result<Vec<ProctoringViolation>> {
        self.list_violations_impl(submission_id).await
    }

    async fn update_violation(
        &self,
        id: i64,
        update: UpdateViolationRequest,
    ) -> Result<Option<ProctoringViolation>> {
        self.update_violation_impl(id, update).await
    }

    // 公开测验
    async fn create_public_submission(
        &self,
        submission: CreatePublicSubmissionRequest,
    ) -> Result<PublicQuizSubmission> {
        self.create_public_submission_impl(submission).await
    }

    async fn list_public_submissions(
        &self,
        quiz_id: Option<i64>,
    ) -> Result<Vec<PublicQuizSubmission>> {
        self.list_public_submissions_impl(quiz_id).await
    }

    // 聊天
    async fn create_chat_command(&self, command: CreateChatCommandRequest) -> Result<ChatCommand> {
        self.create_chat_command_impl(command).await
    }

    async fn list_chat_commands(&self, user_id: Option<i64>) -> Result<Vec<ChatCommand>> {
        self.list_chat_commands_impl(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sqlite://data.db", "sqlite://data.db")]
    #[case("assess.db", "sqlite://assess.db?mode=rwc")]
    #[case("postgres://u:p@localhost/db", "postgres://u:p@localhost/db")]
    fn test_build_database_url(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(SeaOrmStorage::build_database_url(input).unwrap(), expected);
    }

    #[test]
    fn test_build_database_url_rejects_unknown() {
        let err = SeaOrmStorage::build_database_url("redis://localhost").unwrap_err();
        assert_eq!(err.code(), "E001");
    }
}
