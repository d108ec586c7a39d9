//! 注册信息校验

use crate::errors::{AssessError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// 常见弱密码，比较时忽略大小写
const WEAK_PASSWORDS: [&str; 7] = [
    "password1",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "abcd1234",
    "welcome1",
];

pub fn validate_username(username: &str) -> Result<()> {
    // 3 <= 长度 <= 32
    if !(3..=32).contains(&username.chars().count()) {
        return Err(AssessError::validation(
            "Username length must be between 3 and 32 characters",
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(AssessError::validation(
            "Username must contain only letters, numbers, dots, underscores or hyphens",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(AssessError::validation("Email format is invalid"));
    }
    Ok(())
}

/// 密码策略：至少 8 个字符，包含大小写字母与数字，且不是常见弱密码
///
/// 返回全部不满足的规则，便于前端一次性提示。
pub fn password_violations(password: &str) -> Vec<&'static str> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if WEAK_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    errors
}

pub fn validate_password(password: &str) -> Result<()> {
    let errors = password_violations(password);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AssessError::validation(errors.join("; ")))
    }
}
