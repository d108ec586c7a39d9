use crate::models::define_string_enum;

define_string_enum! {
    /// 支持的 AI 服务提供方
    AiProvider, "AI 提供方", "../frontend/src/types/generated/ai.ts" {
        OpenAi => "openai",
        Anthropic => "anthropic",
        Gemini => "gemini",
        DeepSeek => "deepseek",
    }
}

impl Default for AiProvider {
    fn default() -> Self {
        AiProvider::OpenAi
    }
}
