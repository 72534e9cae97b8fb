// 错误类型定义

use thiserror::Error;

/// 启动配置错误（致命，只在初始化时出现）
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {name}")]
    MissingVar { name: &'static str },

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// 单次模型调用的底层错误，只在智能体内部流转
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// 智能体类别，对应编排器中的三个固定槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Flights,
    Attractions,
    GeneralInfo,
}

impl AgentKind {
    /// 对外暴露的固定失败信息
    pub fn failure_message(self) -> &'static str {
        match self {
            AgentKind::Flights => "Failed to search for flights",
            AgentKind::Attractions => "Failed to search for attractions",
            AgentKind::GeneralInfo => "Failed to fetch travel information",
        }
    }
}

/// 智能体失败：丢弃底层细节，只保留是哪个智能体失败
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("{}", .agent.failure_message())]
    SearchFailed { agent: AgentKind },
}

impl AgentError {
    pub fn search_failed(agent: AgentKind) -> Self {
        AgentError::SearchFailed { agent }
    }

    pub fn agent(&self) -> AgentKind {
        match self {
            AgentError::SearchFailed { agent } => *agent,
        }
    }
}

/// 整体编排失败
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("Failed to coordinate travel information")]
    CoordinationFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_error_messages_are_fixed() {
        let err = AgentError::search_failed(AgentKind::Flights);
        assert_eq!(err.to_string(), "Failed to search for flights");
        assert_eq!(err.agent(), AgentKind::Flights);

        let err = AgentError::search_failed(AgentKind::Attractions);
        assert_eq!(err.to_string(), "Failed to search for attractions");
    }

    #[test]
    fn test_config_error_names_variable() {
        let err = ConfigError::MissingVar { name: "OPENAI_API_KEY" };
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
