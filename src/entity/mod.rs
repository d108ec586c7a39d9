//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 列表/对象类字段以 JSON 文本存储，时间以 Unix 秒存储。

pub mod prelude;

pub mod assignment_submissions;
pub mod assignments;
pub mod chat_commands;
pub mod courses;
pub mod enrollments;
pub mod lectures;
pub mod proctoring_violations;
pub mod public_quiz_submissions;
pub mod questions;
pub mod quiz_questions;
pub mod quiz_submissions;
pub mod quizzes;
pub mod users;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

/// 解析 JSON 文本列；损坏的数据按默认值处理
pub(crate) fn from_json_text<T: DeserializeOwned + Default>(text: &str) -> T {
    serde_json::from_str(text).unwrap_or_default()
}

pub(crate) fn from_json_text_opt<T: DeserializeOwned>(text: Option<String>) -> Option<T> {
    text.and_then(|t| serde_json::from_str(&t).ok())
}

pub(crate) fn to_json_text<T: Serialize>(value: &T) -> crate::errors::Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub(crate) fn to_json_text_opt<T: Serialize>(
    value: Option<&T>,
) -> crate::errors::Result<Option<String>> {
    value.map(to_json_text).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_text_roundtrip_tolerates_garbage() {
        let tags: Vec<String> = from_json_text("not json");
        assert!(tags.is_empty());
        let tags: Vec<String> = from_json_text(r#"["a","b"]"#);
        assert_eq!(tags, vec!["a", "b"]);
        assert_eq!(from_json_text_opt::<Vec<String>>(None), None);
    }

    #[test]
    fn test_to_datetime() {
        assert_eq!(to_datetime(0).timestamp(), 0);
        assert_eq!(to_datetime(1_700_000_000).timestamp(), 1_700_000_000);
    }
}
