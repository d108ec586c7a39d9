//! 数据模型定义
//!
//! 每个领域拆分为 `entities`（存储记录）、`requests`（请求载荷）与
//! `responses`（响应载荷）。

pub mod ai;
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

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// 0 表示成功；1xxx 通用错误；2xxx 用户；3xxx 课程；4xxx 测验与题目；
/// 5xxx 作业与提交；6xxx AI；9xxx 服务端错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    ValidationFailed = 1022,
    RateLimitExceeded = 1029,

    AuthFailed = 2000,
    UserNotFound = 2001,
    UserNameInvalid = 2002,
    UserEmailInvalid = 2003,
    UserPasswordInvalid = 2004,
    UserNameAlreadyExists = 2005,
    UserEmailAlreadyExists = 2006,
    RegisterFailed = 2007,

    CourseNotFound = 3000,
    CoursePermissionDenied = 3001,
    LectureNotFound = 3002,
    EnrollmentNotFound = 3003,
    AlreadyEnrolled = 3004,

    QuestionNotFound = 4000,
    QuizNotFound = 4001,
    QuizQuestionConflict = 4002,
    QuizNotAvailable = 4003,
    QuizAttemptsExhausted = 4004,
    PublicLinkNotFound = 4005,
    PublicLinkViewOnly = 4006,

    AssignmentNotFound = 5000,
    SubmissionNotFound = 5001,
    SubmissionStatusInvalid = 5002,
    SubmissionLate = 5003,
    GradeInvalid = 5004,

    AiNotConfigured = 6000,
    AiRequestFailed = 6001,

    InternalServerError = 9000,
    ExportFailed = 9001,
}

/// 定义以字符串序列化的枚举
///
/// 生成 `as_str`、`Display`、`FromStr` 以及带中文提示的 `Deserialize`。
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:tt, $export:tt {
            $($variant:ident => $value:tt),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, ts_rs::TS
        )]
        #[ts(export, export_to = $export)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", $label, s)),
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse::<$name>().map_err(|_| {
                    serde::de::Error::custom(format!(
                        "无效的{}: '{}'. 支持: {}",
                        $label,
                        s,
                        [$($value),+].join(", ")
                    ))
                })
            }
        }
    };
}

pub(crate) use define_string_enum;
