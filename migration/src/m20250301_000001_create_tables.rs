use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 自增主键列
fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_col(Users::Id))
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::AvatarUrl).string().null())
                    .col(
                        ColumnDef::new(Users::ActiveAiProvider)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Users::AiApiKeys).text().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(id_col(Courses::Id))
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text().null())
                    .col(ColumnDef::new(Courses::Code).string().null())
                    .col(
                        ColumnDef::new(Courses::InstructorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::InstructorId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 讲义表
        manager
            .create_table(
                Table::create()
                    .table(Lectures::Table)
                    .if_not_exists()
                    .col(id_col(Lectures::Id))
                    .col(ColumnDef::new(Lectures::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Lectures::Title).string().not_null())
                    .col(ColumnDef::new(Lectures::Description).text().null())
                    .col(ColumnDef::new(Lectures::Content).text().null())
                    .col(ColumnDef::new(Lectures::FileUrl).string().null())
                    .col(
                        ColumnDef::new(Lectures::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Lectures::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Lectures::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 题库表
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(id_col(Questions::Id))
                    .col(
                        ColumnDef::new(Questions::InstructorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Questions::CourseId).big_integer().null())
                    .col(ColumnDef::new(Questions::QuestionType).string().not_null())
                    .col(ColumnDef::new(Questions::QuestionText).text().not_null())
                    .col(ColumnDef::new(Questions::Options).text().not_null())
                    .col(ColumnDef::new(Questions::CorrectAnswer).text().null())
                    .col(
                        ColumnDef::new(Questions::Points)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Questions::Difficulty).string().not_null())
                    .col(ColumnDef::new(Questions::Explanation).text().null())
                    .col(ColumnDef::new(Questions::Tags).text().not_null())
                    .col(
                        ColumnDef::new(Questions::AiGenerated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Questions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Questions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 测验表
        manager
            .create_table(
                Table::create()
                    .table(Quizzes::Table)
                    .if_not_exists()
                    .col(id_col(Quizzes::Id))
                    .col(ColumnDef::new(Quizzes::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Quizzes::Title).string().not_null())
                    .col(ColumnDef::new(Quizzes::Description).text().null())
                    .col(ColumnDef::new(Quizzes::TimeLimit).integer().null())
                    .col(
                        ColumnDef::new(Quizzes::PassingScore)
                            .integer()
                            .not_null()
                            .default(60),
                    )
                    .col(
                        ColumnDef::new(Quizzes::RandomizeQuestions)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Quizzes::RandomizeOptions)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Quizzes::ShowResults)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Quizzes::Proctored)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Quizzes::Status).string().not_null())
                    .col(
                        ColumnDef::new(Quizzes::MaxAttempts)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Quizzes::DueDate).big_integer().null())
                    .col(
                        ColumnDef::new(Quizzes::PublicToken)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Quizzes::PublicPermission).string().null())
                    .col(
                        ColumnDef::new(Quizzes::PublicEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Quizzes::PublicRequiredFields)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Quizzes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Quizzes::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 测验-题目关联表
        manager
            .create_table(
                Table::create()
                    .table(QuizQuestions::Table)
                    .if_not_exists()
                    .col(id_col(QuizQuestions::Id))
                    .col(
                        ColumnDef::new(QuizQuestions::QuizId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuizQuestions::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuizQuestions::OrderIndex)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuizQuestions::Points).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizQuestions::Table, QuizQuestions::QuizId)
                            .to(Quizzes::Table, Quizzes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizQuestions::Table, QuizQuestions::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(id_col(Assignments::Id))
                    .col(
                        ColumnDef::new(Assignments::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(ColumnDef::new(Assignments::Instructions).text().null())
                    .col(ColumnDef::new(Assignments::DueDate).big_integer().null())
                    .col(
                        ColumnDef::new(Assignments::MaxScore)
                            .double()
                            .not_null()
                            .default(100.0),
                    )
                    .col(ColumnDef::new(Assignments::Rubric).text().null())
                    .col(
                        ColumnDef::new(Assignments::AllowLateSubmission)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Assignments::AiGradingEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Assignments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 选课表
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(id_col(Enrollments::Id))
                    .col(
                        ColumnDef::new(Enrollments::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 测验提交表
        manager
            .create_table(
                Table::create()
                    .table(QuizSubmissions::Table)
                    .if_not_exists()
                    .col(id_col(QuizSubmissions::Id))
                    .col(
                        ColumnDef::new(QuizSubmissions::QuizId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuizSubmissions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuizSubmissions::Answers).text().not_null())
                    .col(ColumnDef::new(QuizSubmissions::Score).double().null())
                    .col(ColumnDef::new(QuizSubmissions::TotalPoints).double().null())
                    .col(ColumnDef::new(QuizSubmissions::Percentage).integer().null())
                    .col(ColumnDef::new(QuizSubmissions::Passed).boolean().null())
                    .col(ColumnDef::new(QuizSubmissions::Status).string().not_null())
                    .col(
                        ColumnDef::new(QuizSubmissions::AttemptNumber)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(QuizSubmissions::TimeSpent).integer().null())
                    .col(ColumnDef::new(QuizSubmissions::Feedback).text().null())
                    .col(
                        ColumnDef::new(QuizSubmissions::StartedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuizSubmissions::SubmittedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(QuizSubmissions::GradedAt).big_integer().null())
                    .to_owned(),
            )
            .await?;

        // 作业提交表
        manager
            .create_table(
                Table::create()
                    .table(AssignmentSubmissions::Table)
                    .if_not_exists()
                    .col(id_col(AssignmentSubmissions::Id))
                    .col(
                        ColumnDef::new(AssignmentSubmissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentSubmissions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AssignmentSubmissions::Content).text().null())
                    .col(
                        ColumnDef::new(AssignmentSubmissions::FileUrls)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AssignmentSubmissions::Score).double().null())
                    .col(ColumnDef::new(AssignmentSubmissions::Feedback).text().null())
                    .col(
                        ColumnDef::new(AssignmentSubmissions::RubricScores)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentSubmissions::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentSubmissions::AiDetectionScore)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentSubmissions::AiGraded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AssignmentSubmissions::SubmittedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentSubmissions::GradedAt)
                            .big_integer()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 监考违规表
        manager
            .create_table(
                Table::create()
                    .table(ProctoringViolations::Table)
                    .if_not_exists()
                    .col(id_col(ProctoringViolations::Id))
                    .col(
                        ColumnDef::new(ProctoringViolations::SubmissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProctoringViolations::ViolationType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProctoringViolations::Severity)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProctoringViolations::Description)
                            .text()
                            .null(),
                    )
                    .col(ColumnDef::new(ProctoringViolations::Metadata).text().null())
                    .col(
                        ColumnDef::new(ProctoringViolations::Reviewed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ProctoringViolations::OccurredAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 公开测验提交表
        manager
            .create_table(
                Table::create()
                    .table(PublicQuizSubmissions::Table)
                    .if_not_exists()
                    .col(id_col(PublicQuizSubmissions::Id))
                    .col(
                        ColumnDef::new(PublicQuizSubmissions::QuizId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PublicQuizSubmissions::IdentificationData)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PublicQuizSubmissions::Answers)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PublicQuizSubmissions::Score)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PublicQuizSubmissions::TotalPoints)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PublicQuizSubmissions::Percentage)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PublicQuizSubmissions::Passed)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PublicQuizSubmissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 聊天记录表
        manager
            .create_table(
                Table::create()
                    .table(ChatCommands::Table)
                    .if_not_exists()
                    .col(id_col(ChatCommands::Id))
                    .col(ColumnDef::new(ChatCommands::UserId).big_integer().not_null())
                    .col(ColumnDef::new(ChatCommands::Command).text().not_null())
                    .col(ColumnDef::new(ChatCommands::Response).text().null())
                    .col(ColumnDef::new(ChatCommands::Provider).string().null())
                    .col(
                        ColumnDef::new(ChatCommands::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_instructor_id")
                    .table(Courses::Table)
                    .col(Courses::InstructorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_quizzes_course_id")
                    .table(Quizzes::Table)
                    .col(Quizzes::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_course_id")
                    .table(Assignments::Table)
                    .col(Assignments::CourseId)
                    .to_owned(),
            )
            .await?;

        // 同一测验内 order_index 唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_quiz_questions_quiz_order")
                    .table(QuizQuestions::Table)
                    .col(QuizQuestions::QuizId)
                    .col(QuizQuestions::OrderIndex)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_course_student")
                    .table(Enrollments::Table)
                    .col(Enrollments::CourseId)
                    .col(Enrollments::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_quiz_submissions_quiz_student")
                    .table(QuizSubmissions::Table)
                    .col(QuizSubmissions::QuizId)
                    .col(QuizSubmissions::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignment_submissions_assignment_student")
                    .table(AssignmentSubmissions::Table)
                    .col(AssignmentSubmissions::AssignmentId)
                    .col(AssignmentSubmissions::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_violations_submission_id")
                    .table(ProctoringViolations::Table)
                    .col(ProctoringViolations::SubmissionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatCommands::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PublicQuizSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProctoringViolations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssignmentSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuizSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuizQuestions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quizzes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lectures::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Name,
    AvatarUrl,
    ActiveAiProvider,
    AiApiKeys,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    Title,
    Description,
    Code,
    InstructorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Lectures {
    #[sea_orm(iden = "lectures")]
    Table,
    Id,
    CourseId,
    Title,
    Description,
    Content,
    FileUrl,
    OrderIndex,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Questions {
    #[sea_orm(iden = "questions")]
    Table,
    Id,
    InstructorId,
    CourseId,
    QuestionType,
    QuestionText,
    Options,
    CorrectAnswer,
    Points,
    Difficulty,
    Explanation,
    Tags,
    AiGenerated,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Quizzes {
    #[sea_orm(iden = "quizzes")]
    Table,
    Id,
    CourseId,
    Title,
    Description,
    TimeLimit,
    PassingScore,
    RandomizeQuestions,
    RandomizeOptions,
    ShowResults,
    Proctored,
    Status,
    MaxAttempts,
    DueDate,
    PublicToken,
    PublicPermission,
    PublicEnabled,
    PublicRequiredFields,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuizQuestions {
    #[sea_orm(iden = "quiz_questions")]
    Table,
    Id,
    QuizId,
    QuestionId,
    OrderIndex,
    Points,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    CourseId,
    Title,
    Description,
    Instructions,
    DueDate,
    MaxScore,
    Rubric,
    AllowLateSubmission,
    AiGradingEnabled,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    CourseId,
    StudentId,
    EnrolledAt,
}

#[derive(DeriveIden)]
enum QuizSubmissions {
    #[sea_orm(iden = "quiz_submissions")]
    Table,
    Id,
    QuizId,
    StudentId,
    Answers,
    Score,
    TotalPoints,
    Percentage,
    Passed,
    Status,
    AttemptNumber,
    TimeSpent,
    Feedback,
    StartedAt,
    SubmittedAt,
    GradedAt,
}

#[derive(DeriveIden)]
enum AssignmentSubmissions {
    #[sea_orm(iden = "assignment_submissions")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    Content,
    FileUrls,
    Score,
    Feedback,
    RubricScores,
    Status,
    AiDetectionScore,
    AiGraded,
    SubmittedAt,
    GradedAt,
}

#[derive(DeriveIden)]
enum ProctoringViolations {
    #[sea_orm(iden = "proctoring_violations")]
    Table,
    Id,
    SubmissionId,
    ViolationType,
    Severity,
    Description,
    Metadata,
    Reviewed,
    OccurredAt,
}

#[derive(DeriveIden)]
enum PublicQuizSubmissions {
    #[sea_orm(iden = "public_quiz_submissions")]
    Table,
    Id,
    QuizId,
    IdentificationData,
    Answers,
    Score,
    TotalPoints,
    Percentage,
    Passed,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum ChatCommands {
    #[sea_orm(iden = "chat_commands")]
    Table,
    Id,
    UserId,
    Command,
    Response,
    Provider,
    CreatedAt,
}
