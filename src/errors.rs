//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_assess_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum AssessError {
            $($variant(String),)*
        }

        impl AssessError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AssessError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AssessError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AssessError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl AssessError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AssessError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_assess_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    Conflict("E006", "Resource Conflict"),
    Serialization("E007", "Serialization Error"),
    Authentication("E008", "Authentication Error"),
    Authorization("E009", "Authorization Error"),
    AiProviderNotConfigured("E010", "AI Provider Not Configured"),
    AiProvider("E011", "AI Provider Error"),
    AiResponse("E012", "AI Response Error"),
    Export("E013", "Export Error"),
    Io("E014", "IO Error"),
}

impl AssessError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否属于调用方输入问题（映射为 4xx）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AssessError::Validation(_)
                | AssessError::NotFound(_)
                | AssessError::Conflict(_)
                | AssessError::Authentication(_)
                | AssessError::Authorization(_)
                | AssessError::AiProviderNotConfigured(_)
        )
    }
}

impl fmt::Display for AssessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AssessError {}

impl From<sea_orm::DbErr> for AssessError {
    fn from(err: sea_orm::DbErr) -> Self {
        AssessError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AssessError {
    fn from(err: std::io::Error) -> Self {
        AssessError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AssessError {
    fn from(err: serde_json::Error) -> Self {
        AssessError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for AssessError {
    fn from(err: reqwest::Error) -> Self {
        AssessError::AiProvider(err.to_string())
    }
}

impl From<csv::Error> for AssessError {
    fn from(err: csv::Error) -> Self {
        AssessError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AssessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AssessError::database_config("test").code(), "E001");
        assert_eq!(AssessError::validation("test").code(), "E004");
        assert_eq!(AssessError::authentication("test").code(), "E008");
        assert_eq!(AssessError::ai_provider("test").code(), "E011");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AssessError::ai_provider_not_configured("test").error_type(),
            "AI Provider Not Configured"
        );
        assert_eq!(
            AssessError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = AssessError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = AssessError::conflict("Already enrolled");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Conflict"));
        assert!(formatted.contains("Already enrolled"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(AssessError::validation("x").is_client_error());
        assert!(AssessError::not_found("x").is_client_error());
        assert!(!AssessError::database_operation("x").is_client_error());
        assert!(!AssessError::ai_response("x").is_client_error());
    }
}
