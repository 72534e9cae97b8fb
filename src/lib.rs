// 库入口文件 - 导出公共 API

pub mod agents;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod orchestrator;
pub mod plan;
pub mod protocol;

// 重新导出常用类型
pub use agents::{AgentSettings, AttractionAgent, FlightAgent, GeneralInfoAgent, TravelAgent};
pub use client::{CompletionBackend, ModelClient, ScriptedBackend, ScriptedReply};
pub use config::{Config, DecodePolicy};
pub use error::{AgentError, AgentKind, ClientError, ConfigError, OrchestratorError};
pub use orchestrator::Orchestrator;
pub use plan::{create_plan, OrchestrationPlan};
pub use protocol::{
    AttractionResult, AttractionSearchParams, ComprehensiveResponse, FlightResult,
    FlightSearchParams, TravelQuery, TravelResponse, UserQuery,
};
