//! 数据存储层
//!
//! `Storage` 是所有实体的统一仓储契约：
//! - 读取单条记录时不存在返回 `Ok(None)`，不视为错误
//! - 更新不存在的记录返回 `Ok(None)` 且不产生任何写入
//! - 删除是幂等的，返回值仅表示本次是否删除了记录
//!
//! 默认值策略与合并逻辑定义在 `models` 的业务实体上，两个后端共用。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
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

pub mod memory_storage;
pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户（可按角色筛选）
    async fn list_users(&self, role: Option<UserRole>) -> Result<Vec<User>>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 更新用户 AI 设置
    async fn update_user_ai_settings(
        &self,
        id: i64,
        update: UpdateAiSettingsRequest,
    ) -> Result<Option<User>>;

    /// 课程管理方法
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn list_courses(&self, query: CourseListQuery) -> Result<Vec<Course>>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>>;
    // 删除课程（同时删除其选课记录）
    async fn delete_course(&self, id: i64) -> Result<bool>;

    /// 讲义管理方法
    async fn create_lecture(&self, lecture: CreateLectureRequest) -> Result<Lecture>;
    async fn get_lecture_by_id(&self, id: i64) -> Result<Option<Lecture>>;
    async fn list_lectures(&self, query: LectureListQuery) -> Result<Vec<Lecture>>;
    async fn update_lecture(
        &self,
        id: i64,
        update: UpdateLectureRequest,
    ) -> Result<Option<Lecture>>;
    async fn delete_lecture(&self, id: i64) -> Result<bool>;

    /// 题库管理方法
    async fn create_question(&self, question: CreateQuestionRequest) -> Result<Question>;
    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>>;
    async fn list_questions(&self, query: QuestionListQuery) -> Result<Vec<Question>>;
    async fn update_question(
        &self,
        id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<Question>>;
    // 删除题目（同时从所有测验中移除）
    async fn delete_question(&self, id: i64) -> Result<bool>;

    /// 测验管理方法
    async fn create_quiz(&self, quiz: CreateQuizRequest) -> Result<Quiz>;
    async fn get_quiz_by_id(&self, id: i64) -> Result<Option<Quiz>>;
    // 通过公开令牌查找测验（不检查是否启用）
    async fn get_quiz_by_public_token(&self, token: &str) -> Result<Option<Quiz>>;
    async fn list_quizzes(&self, query: QuizListQuery) -> Result<Vec<Quiz>>;
    async fn update_quiz(&self, id: i64, update: UpdateQuizRequest) -> Result<Option<Quiz>>;
    // 设置公开访问（生成令牌会覆盖旧令牌）
    async fn set_quiz_public_access(&self, id: i64, access: PublicAccess)
    -> Result<Option<Quiz>>;
    // 删除测验（同时删除题目关联）
    async fn delete_quiz(&self, id: i64) -> Result<bool>;

    /// 测验题目关联
    // 添加题目；order_index 已占用时返回冲突错误
    async fn add_quiz_question(
        &self,
        quiz_id: i64,
        link: CreateQuizQuestionRequest,
    ) -> Result<QuizQuestion>;
    // 按 order_index 升序列出
    async fn list_quiz_questions(&self, quiz_id: i64) -> Result<Vec<QuizQuestion>>;
    async fn remove_quiz_question(&self, quiz_id: i64, question_id: i64) -> Result<bool>;

    /// 作业管理方法
    async fn create_assignment(&self, assignment: CreateAssignmentRequest) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments(&self, query: AssignmentListQuery) -> Result<Vec<Assignment>>;
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, id: i64) -> Result<bool>;

    /// 选课管理方法
    async fn create_enrollment(&self, enrollment: CreateEnrollmentRequest) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn list_enrollments(&self, query: EnrollmentListQuery) -> Result<Vec<Enrollment>>;
    async fn delete_enrollment(&self, id: i64) -> Result<bool>;

    /// 测验提交（不可删除）
    async fn create_quiz_submission(
        &self,
        submission: CreateQuizSubmissionRequest,
    ) -> Result<QuizSubmission>;
    async fn get_quiz_submission_by_id(&self, id: i64) -> Result<Option<QuizSubmission>>;
    async fn list_quiz_submissions(
        &self,
        query: QuizSubmissionListQuery,
    ) -> Result<Vec<QuizSubmission>>;
    // 状态回退返回校验错误
    async fn update_quiz_submission(
        &self,
        id: i64,
        update: UpdateQuizSubmissionRequest,
    ) -> Result<Option<QuizSubmission>>;

    /// 作业提交（不可删除）
    async fn create_assignment_submission(
        &self,
        submission: CreateAssignmentSubmissionRequest,
    ) -> Result<AssignmentSubmission>;
    async fn get_assignment_submission_by_id(
        &self,
        id: i64,
    ) -> Result<Option<AssignmentSubmission>>;
    async fn list_assignment_submissions(
        &self,
        query: AssignmentSubmissionListQuery,
    ) -> Result<Vec<AssignmentSubmission>>;
    async fn update_assignment_submission(
        &self,
        id: i64,
        update: UpdateAssignmentSubmissionRequest,
    ) -> Result<Option<AssignmentSubmission>>;

    /// 监考违规（不可删除）
    async fn create_violation(&self, violation: CreateViolationRequest)
    -> Result<ProctoringViolation>;
    async fn list_violations(&self, submission_id: Option<i64>)
    -> Result<Vec<ProctoringViolation>>;
    async fn update_violation(
        &self,
        id: i64,
        update: UpdateViolationRequest,
    ) -> Result<Option<ProctoringViolation>>;

    /// 公开测验提交（不可删除）
    async fn create_public_submission(
        &self,
        submission: CreatePublicSubmissionRequest,
    ) -> Result<PublicQuizSubmission>;
    async fn list_public_submissions(&self, quiz_id: Option<i64>)
    -> Result<Vec<PublicQuizSubmission>>;

    /// 聊天记录
    async fn create_chat_command(&self, command: CreateChatCommandRequest) -> Result<ChatCommand>;
    async fn list_chat_commands(&self, user_id: Option<i64>) -> Result<Vec<ChatCommand>>;
}

/// 根据配置创建存储后端：`database.url` 为空或 "memory" 时使用内存存储
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let config = AppConfig::get();
    if config.database.is_memory() {
        tracing::warn!("Using in-memory storage, data will be lost on restart");
        return Ok(Arc::new(memory_storage::MemoryStorage::new()));
    }
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
