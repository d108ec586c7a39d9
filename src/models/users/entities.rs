use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::requests::{CreateUserRequest, UpdateAiSettingsRequest, UpdateUserRequest};
use crate::models::ai::entities::AiProvider;
use crate::models::define_string_enum;

define_string_enum! {
    // 用户角色
    UserRole, "用户角色", "../frontend/src/types/generated/user.ts" {
        Student => "student",
        Instructor => "instructor",
        Admin => "admin",
    }
}

impl UserRole {
    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn instructor_roles() -> &'static [&'static UserRole] {
        &[&Self::Instructor, &Self::Admin]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Student, &Self::Instructor, &Self::Admin]
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Instructor | UserRole::Admin)
    }
}

// 用户实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub name: String,
    pub avatar_url: Option<String>,
    pub active_ai_provider: AiProvider,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub ai_api_keys: BTreeMap<AiProvider, String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// 按默认值策略构造新用户
    pub fn from_request(
        id: i64,
        req: CreateUserRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let name = req
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| req.username.clone());
        Self {
            id,
            username: req.username,
            email: req.email,
            password_hash: req.password,
            role: req.role.unwrap_or(UserRole::Student),
            name,
            avatar_url: req.avatar_url,
            active_ai_provider: AiProvider::default(),
            ai_api_keys: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateUserRequest, now: chrono::DateTime<chrono::Utc>) {
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(password) = update.password {
            self.password_hash = password;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(avatar_url) = update.avatar_url {
            self.avatar_url = Some(avatar_url);
        }
        self.updated_at = now;
    }

    /// 合并 AI 设置；空字符串表示删除该提供方的密钥
    pub fn apply_ai_settings(
        &mut self,
        update: UpdateAiSettingsRequest,
        now: chrono::DateTime<chrono::Utc>,
    ) {
        if let Some(provider) = update.active_provider {
            self.active_ai_provider = provider;
        }
        if let Some(keys) = update.api_keys {
            for (provider, key) in keys {
                let key = key.trim().to_string();
                if key.is_empty() {
                    self.ai_api_keys.remove(&provider);
                } else {
                    self.ai_api_keys.insert(provider, key);
                }
            }
        }
        self.updated_at = now;
    }

    // 生成访问令牌
    pub fn generate_access_token(&self) -> crate::errors::Result<String> {
        crate::utils::jwt::JwtUtils::generate_access_token(self.id, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::from_request(
            1,
            CreateUserRequest {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "hash".to_string(),
                role: None,
                name: None,
                avatar_url: None,
            },
            chrono::Utc::now(),
        )
    }

    #[test]
    fn test_user_defaults() {
        let user = sample_user();
        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.name, "alice");
        assert_eq!(user.active_ai_provider, AiProvider::OpenAi);
        assert!(user.ai_api_keys.is_empty());
    }

    #[test]
    fn test_secrets_not_serialized() {
        let mut user = sample_user();
        user.ai_api_keys
            .insert(AiProvider::Anthropic, "sk-secret".to_string());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hash"));
        assert!(!json.contains("sk-secret"));
        assert!(json.contains("\"activeAiProvider\":\"openai\""));
        assert!(json.contains("\"avatarUrl\":null"));
    }

    #[test]
    fn test_ai_settings_merge() {
        let mut user = sample_user();
        let mut keys = BTreeMap::new();
        keys.insert(AiProvider::Gemini, " g-key ".to_string());
        user.apply_ai_settings(
            UpdateAiSettingsRequest {
                active_provider: Some(AiProvider::Gemini),
                api_keys: Some(keys),
            },
            chrono::Utc::now(),
        );
        assert_eq!(user.active_ai_provider, AiProvider::Gemini);
        assert_eq!(user.ai_api_keys.get(&AiProvider::Gemini).unwrap(), "g-key");

        let mut remove = BTreeMap::new();
        remove.insert(AiProvider::Gemini, String::new());
        user.apply_ai_settings(
            UpdateAiSettingsRequest {
                active_provider: None,
                api_keys: Some(remove),
            },
            chrono::Utc::now(),
        );
        assert!(user.ai_api_keys.is_empty());
        assert_eq!(user.active_ai_provider, AiProvider::Gemini);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("instructor".parse::<UserRole>().unwrap(), UserRole::Instructor);
        assert!("teacher".parse::<UserRole>().is_err());
        let err = serde_json::from_str::<UserRole>("\"root\"").unwrap_err();
        assert!(err.to_string().contains("student, instructor, admin"));
    }
}
