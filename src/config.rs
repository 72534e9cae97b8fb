// 配置加载 - 从环境变量（以及 .env 文件）读取

use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// 可解析但缺少内容时的解码策略
///
/// 只影响三种情况：结构化载荷缺失、顶层字段缺失、资讯正文为空。
/// `Lenient` 下视为空结果（资讯为占位文本），`Strict` 下视为该智能体失败。
/// 调用本身失败与载荷无法解析在两种策略下都是失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    #[default]
    Lenient,
    Strict,
}

/// 运行配置
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub decode_policy: DecodePolicy,
    pub log_level: tracing::Level,
}

impl Config {
    /// 从进程环境读取配置，缺少 API key 时直接失败
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("OPENAI_API_KEY").ok_or(ConfigError::MissingVar {
            name: "OPENAI_API_KEY",
        })?;

        let model = get("MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = get("API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout_secs = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "REQUEST_TIMEOUT_SECS",
                value: raw.clone(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let decode_policy = match get("STRICT_DECODING").as_deref() {
            None => DecodePolicy::Lenient,
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => DecodePolicy::Strict,
                "0" | "false" | "no" | "off" => DecodePolicy::Lenient,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "STRICT_DECODING",
                        value: raw.to_string(),
                    })
                }
            },
        };

        let log_level = match get("LOG_LEVEL") {
            Some(raw) => tracing::Level::from_str(&raw).map_err(|_| ConfigError::InvalidValue {
                name: "LOG_LEVEL",
                value: raw.clone(),
            })?,
            None => tracing::Level::INFO,
        };

        Ok(Self {
            api_key,
            model,
            base_url,
            request_timeout_secs,
            decode_policy,
            log_level,
        })
    }
}
