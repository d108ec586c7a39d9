use crate::config::AiConfig;
use crate::errors::{AssessError, Result};
use crate::models::ai::entities::AiProvider;
use crate::models::users::entities::User;

/// 请求/响应报文格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// OpenAI 兼容的 chat completions
    ChatCompletions,
    /// Anthropic Messages API
    Messages,
    /// Gemini generateContent
    GenerateContent,
}

#[derive(Debug)]
pub struct ProviderSpec {
    pub provider: AiProvider,
    pub endpoint: &'static str,
    pub default_model: &'static str,
    pub wire_format: WireFormat,
}

static PROVIDERS: [ProviderSpec; 4] = [
    ProviderSpec {
        provider: AiProvider::OpenAi,
        endpoint: "https://api.openai.com/v1/chat/completions",
        default_model: "gpt-4o-mini",
        wire_format: WireFormat::ChatCompletions,
    },
    ProviderSpec {
        provider: AiProvider::Anthropic,
        endpoint: "https://api.anthropic.com/v1/messages",
        default_model: "claude-3-5-haiku-latest",
        wire_format: WireFormat::Messages,
    },
    ProviderSpec {
        provider: AiProvider::Gemini,
        // {model} 在请求时替换
        endpoint: "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent",
        default_model: "gemini-1.5-flash",
        wire_format: WireFormat::GenerateContent,
    },
    ProviderSpec {
        provider: AiProvider::DeepSeek,
        endpoint: "https://api.deepseek.com/chat/completions",
        default_model: "deepseek-chat",
        wire_format: WireFormat::ChatCompletions,
    },
];

pub fn provider_spec(provider: AiProvider) -> &'static ProviderSpec {
    PROVIDERS
        .iter()
        .find(|spec| spec.provider == provider)
        .unwrap_or(&PROVIDERS[0])
}

/// 平台配置的默认密钥
pub fn platform_key(config: &AiConfig, provider: AiProvider) -> Option<&str> {
    let key = match provider {
        AiProvider::OpenAi => &config.openai_api_key,
        AiProvider::Anthropic => &config.anthropic_api_key,
        AiProvider::Gemini => &config.gemini_api_key,
        AiProvider::DeepSeek => &config.deepseek_api_key,
    };
    let key = key.trim();
    (!key.is_empty()).then_some(key)
}

/// 平台提供默认密钥的提供方
pub fn platform_providers(config: &AiConfig) -> Vec<AiProvider> {
    AiProvider::ALL
        .iter()
        .copied()
        .filter(|p| platform_key(config, *p).is_some())
        .collect()
}

/// 一次 AI 调用使用的凭据
#[derive(Clone)]
pub struct ProviderCredentials {
    pub provider: AiProvider,
    pub api_key: String,
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("provider", &self.provider)
            .field("api_key", &"***")
            .finish()
    }
}

/// 解析用户当前提供方的凭据：用户密钥优先，其次平台默认密钥
pub fn resolve_credentials(user: &User, config: &AiConfig) -> Result<ProviderCredentials> {
    let provider = user.active_ai_provider;
    let user_key = user
        .ai_api_keys
        .get(&provider)
        .map(|k| k.trim())
        .filter(|k| !k.is_empty());

    match user_key.or_else(|| platform_key(config, provider)) {
        Some(key) => Ok(ProviderCredentials {
            provider,
            api_key: key.to_string(),
        }),
        None => Err(AssessError::ai_provider_not_configured(format!(
            "No API key configured for provider '{provider}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::requests::CreateUserRequest;
    use rstest::rstest;

    fn config(openai: &str) -> AiConfig {
        AiConfig {
            request_timeout: 30,
            max_tokens: 512,
            openai_api_key: openai.to_string(),
            anthropic_api_key: String::new(),
            gemini_api_key: String::new(),
            deepseek_api_key: String::new(),
        }
    }

    fn user() -> User {
        User::from_request(
            1,
            CreateUserRequest {
                username: "teacher1".to_string(),
                email: "t@example.com".to_string(),
                password: "hash".to_string(),
                role: None,
                name: None,
                avatar_url: None,
            },
            chrono::Utc::now(),
        )
    }

    #[rstest]
    #[case(AiProvider::OpenAi, WireFormat::ChatCompletions)]
    #[case(AiProvider::DeepSeek, WireFormat::ChatCompletions)]
    #[case(AiProvider::Anthropic, WireFormat::Messages)]
    #[case(AiProvider::Gemini, WireFormat::GenerateContent)]
    fn test_provider_table(#[case] provider: AiProvider, #[case] format: WireFormat) {
        let spec = provider_spec(provider);
        assert_eq!(spec.provider, provider);
        assert_eq!(spec.wire_format, format);
    }

    #[test]
    fn test_user_key_wins_over_platform() {
        let mut u = user();
        u.ai_api_keys.insert(AiProvider::OpenAi, "user-key".to_string());
        let creds = resolve_credentials(&u, &config("platform-key")).unwrap();
        assert_eq!(creds.api_key, "user-key");
    }

    #[test]
    fn test_platform_key_fallback() {
        let creds = resolve_credentials(&user(), &config("platform-key")).unwrap();
        assert_eq!(creds.provider, AiProvider::OpenAi);
        assert_eq!(creds.api_key, "platform-key");
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let mut u = user();
        u.active_ai_provider = AiProvider::Gemini;
        let err = resolve_credentials(&u, &config("platform-key")).unwrap_err();
        assert_eq!(err.code(), "E010");
    }

    #[test]
    fn test_debug_hides_key() {
        let creds = ProviderCredentials {
            provider: AiProvider::OpenAi,
            api_key: "secret".to_string(),
        };
        assert!(!format!("{creds:?}").contains("secret"));
    }
}
