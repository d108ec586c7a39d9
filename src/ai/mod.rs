//! AI 提供方抽象
//!
//! - `provider`: 提供方静态表与凭据解析
//! - `client`: `AiClient` trait 及基于 reqwest 的实现
//! - `features`: 各 AI 功能的提示词与回复解析

pub mod client;
pub mod features;
pub mod provider;

pub use client::{AiClient, AiPrompt, HttpAiClient};
pub use provider::{ProviderCredentials, resolve_credentials};
