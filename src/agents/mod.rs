// 智能体公共部分 - 能力接口、提示词调用与结构化结果解码

pub mod attraction;
pub mod flight;
pub mod general_info;

pub use attraction::{attraction_image_url, AttractionAgent};
pub use flight::FlightAgent;
pub use general_info::GeneralInfoAgent;

use crate::client::CompletionBackend;
use crate::config::{Config, DecodePolicy, DEFAULT_MODEL};
use crate::error::{AgentError, AgentKind, ClientError};
use crate::protocol::{ChatMessage, CompletionRequest, CompletionResponse, OutputContract};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

const MAX_LOG_CHARS: usize = 2_000;

/// 智能体能力接口
#[async_trait]
pub trait TravelAgent: Send + Sync {
    type Params: Send + Sync;
    type Output: Send;

    fn kind(&self) -> AgentKind;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn execute(&self, params: &Self::Params) -> Result<Self::Output, AgentError>;
}

/// 各智能体共享的设置
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    pub model: String,
    pub decode_policy: DecodePolicy,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            decode_policy: DecodePolicy::Lenient,
        }
    }
}

impl From<&Config> for AgentSettings {
    fn from(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            decode_policy: config.decode_policy,
        }
    }
}

/// 一次提示词生成调用：系统提示 + 用户提示 + 可选的结构化约定
pub(crate) struct PromptedGeneration {
    backend: Arc<dyn CompletionBackend>,
    settings: AgentSettings,
}

impl PromptedGeneration {
    pub(crate) fn new(backend: Arc<dyn CompletionBackend>, settings: AgentSettings) -> Self {
        Self { backend, settings }
    }

    pub(crate) fn decode_policy(&self) -> DecodePolicy {
        self.settings.decode_policy
    }

    pub(crate) async fn generate(
        &self,
        system: &str,
        user: String,
        contract: Option<OutputContract>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<CompletionResponse, ClientError> {
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(user_prompt = %truncate_for_log(&user, MAX_LOG_CHARS), "智能体提示词");
        }

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature,
            max_tokens,
            output_contract: contract,
        };

        let response = self.backend.complete(request).await?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            if let Some(args) = &response.function_arguments {
                debug!(arguments = %truncate_for_log(args, MAX_LOG_CHARS), "结构化输出原文");
            }
        }

        Ok(response)
    }
}

/// 结构化结果解码失败
#[derive(Debug, Error)]
pub(crate) enum DecodeError {
    /// 参数不是合法 JSON 或条目形状不符
    #[error("malformed structured output: {0}")]
    Malformed(serde_json::Error),
    /// 严格模式下缺少载荷或顶层字段
    #[error("structured output has no '{0}' field")]
    MissingKey(&'static str),
}

/// 把结构化参数原文解码为指定顶层字段下的列表
///
/// 宽松模式下，缺少载荷或缺少顶层字段都视为空列表。
pub(crate) fn decode_collection<T: DeserializeOwned>(
    arguments: Option<&str>,
    key: &'static str,
    policy: DecodePolicy,
) -> Result<Vec<T>, DecodeError> {
    let raw = match arguments {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return missing(key, policy),
    };

    let mut payload: Value = serde_json::from_str(raw).map_err(DecodeError::Malformed)?;

    match payload.get_mut(key).map(Value::take) {
        Some(Value::Null) | None => missing(key, policy),
        Some(items) => serde_json::from_value(items).map_err(DecodeError::Malformed),
    }
}

fn missing<T>(key: &'static str, policy: DecodePolicy) -> Result<Vec<T>, DecodeError> {
    match policy {
        DecodePolicy::Lenient => Ok(Vec::new()),
        DecodePolicy::Strict => Err(DecodeError::MissingKey(key)),
    }
}

pub(crate) fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let char_count = input.chars().count();
    if char_count <= max_chars {
        return input.to_string();
    }
    let mut preview: String = input.chars().take(max_chars).collect();
    preview.push_str(&format!("... [truncated, total_chars={}]", char_count));
    preview
}
