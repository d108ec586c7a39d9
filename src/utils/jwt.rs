use crate::config::AppConfig;
use crate::errors::{AssessError, Result};
use crate::models::users::entities::UserRole;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Subject (user ID)
    pub role: String, // 用户角色
    pub exp: usize,   // Expiration time (时间戳)
    pub iat: usize,   // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AssessError::authentication("Invalid token subject"))
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 生成 Access Token，有效期取自 jwt.access_token_expiry（秒）
    pub fn generate_access_token(user_id: i64, role: UserRole) -> Result<String> {
        let config = AppConfig::get();
        Self::generate_token_with_expiry(
            &Self::get_secret(),
            user_id,
            role,
            chrono::Duration::seconds(config.jwt.access_token_expiry),
        )
    }

    // 生成带自定义过期时间的 Token
    pub fn generate_token_with_expiry(
        secret: &str,
        user_id: i64,
        role: UserRole,
        expiry_duration: chrono::Duration,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: expiration.timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
        };

        let encoding_key = EncodingKey::from_secret(secret.as_ref());
        encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| AssessError::authentication(format!("Failed to sign token: {e}")))
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims> {
        Self::verify_token_with_secret(&Self::get_secret(), token)
    }

    pub fn verify_token_with_secret(secret: &str, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| AssessError::authentication(format!("Invalid or expired token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip_keeps_subject_and_role() {
        let token = JwtUtils::generate_token_with_expiry(
            SECRET,
            42,
            UserRole::Instructor,
            chrono::Duration::hours(1),
        )
        .unwrap();
        let claims = JwtUtils::verify_token_with_secret(SECRET, &token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role, "instructor");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = JwtUtils::generate_token_with_expiry(
            SECRET,
            1,
            UserRole::Student,
            chrono::Duration::hours(-2),
        )
        .unwrap();
        let err = JwtUtils::verify_token_with_secret(SECRET, &token).unwrap_err();
        assert_eq!(err.code(), "E008");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = JwtUtils::generate_token_with_expiry(
            SECRET,
            1,
            UserRole::Student,
            chrono::Duration::hours(1),
        )
        .unwrap();
        assert!(JwtUtils::verify_token_with_secret("other", &token).is_err());
    }
}
