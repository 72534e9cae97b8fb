// 编排器 - 并发调用三个智能体并汇总结果

use crate::agents::{AgentSettings, AttractionAgent, FlightAgent, GeneralInfoAgent, TravelAgent};
use crate::client::{CompletionBackend, ModelClient};
use crate::config::Config;
use crate::error::{AgentError, ClientError, OrchestratorError};
use crate::plan::{create_plan, OrchestrationPlan};
use crate::protocol::{
    AttractionResult, ComprehensiveResponse, FlightResult, TravelResponse, UserQuery,
};
use chrono::Utc;
use futures::future::join3;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 单个槽位的结算结果
pub type SlotOutcome<T> = Result<T, AgentError>;

/// 三个固定槽位：航班、景点、综合资讯
#[derive(Debug, Clone)]
pub struct SettledSlots {
    pub flights: SlotOutcome<Vec<FlightResult>>,
    pub attractions: SlotOutcome<Vec<AttractionResult>>,
    pub general_info: SlotOutcome<TravelResponse>,
}

/// 出行助手编排器
pub struct Orchestrator {
    flight_agent: FlightAgent,
    attraction_agent: AttractionAgent,
    general_info_agent: GeneralInfoAgent,
}

impl Orchestrator {
    /// 三个智能体共用同一个注入的后端
    pub fn new(backend: Arc<dyn CompletionBackend>, settings: AgentSettings) -> Self {
        Self {
            flight_agent: FlightAgent::new(backend.clone(), settings.clone()),
            attraction_agent: AttractionAgent::new(backend.clone(), settings.clone()),
            general_info_agent: GeneralInfoAgent::new(backend, settings),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let client = ModelClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), AgentSettings::from(config)))
    }

    pub fn name(&self) -> &str {
        "Travel Assistant Orchestrator"
    }

    pub fn description(&self) -> &str {
        "Coordinates different travel-related agents to provide comprehensive travel information"
    }

    /// 被编排的智能体名称（按槽位顺序）
    pub fn agent_names(&self) -> [&str; 3] {
        [
            self.flight_agent.name(),
            self.attraction_agent.name(),
            self.general_info_agent.name(),
        ]
    }

    pub fn create_plan(&self, query: &UserQuery) -> OrchestrationPlan {
        let plan = create_plan(query);
        info!(
            needs_flights = plan.needs_flights(),
            needs_attractions = plan.needs_attractions(),
            needs_general_info = plan.needs_general_info(),
            "编排计划已生成"
        );
        debug!(plan = ?plan, "编排计划详情");
        plan
    }

    /// 处理一次用户查询
    pub async fn coordinate_request(
        &self,
        query: &UserQuery,
    ) -> Result<ComprehensiveResponse, OrchestratorError> {
        let plan = self.create_plan(query);

        let settled = AssertUnwindSafe(self.fan_out(&plan))
            .catch_unwind()
            .await
            .map_err(|_| {
                warn!("编排过程中出现异常");
                OrchestratorError::CoordinationFailed
            })?;

        let response = assemble(&plan, settled);
        info!(
            flights = response.flights.as_ref().map(Vec::len),
            attractions = response.attractions.as_ref().map(Vec::len),
            general_info = response.general_info.is_some(),
            errors = response.errors.len(),
            "汇总完成"
        );
        Ok(response)
    }

    /// 同时发起三个槽位，等待全部结算；未启用的槽位直接以空结果结算
    async fn fan_out(&self, plan: &OrchestrationPlan) -> SettledSlots {
        let flights = async {
            match &plan.flight_params {
                Some(params) => self.flight_agent.execute(params).await,
                None => Ok(Vec::new()),
            }
        };
        let attractions = async {
            match &plan.attraction_params {
                Some(params) => self.attraction_agent.execute(params).await,
                None => Ok(Vec::new()),
            }
        };
        let general_info = self.general_info_agent.execute(&plan.research_params);

        let (flights, attractions, general_info) = join3(flights, attractions, general_info).await;

        SettledSlots {
            flights,
            attractions,
            general_info,
        }
    }
}

/// 汇总三个槽位：成功且计划需要才写入字段，失败信息按槽位顺序收集
pub fn assemble(plan: &OrchestrationPlan, slots: SettledSlots) -> ComprehensiveResponse {
    let mut errors = Vec::new();

    let flights = settle(slots.flights, plan.needs_flights(), &mut errors);
    let attractions = settle(slots.attractions, plan.needs_attractions(), &mut errors);
    let general_info = settle(slots.general_info, plan.needs_general_info(), &mut errors);

    ComprehensiveResponse {
        flights,
        attractions,
        general_info,
        errors,
        timestamp: Utc::now(),
    }
}

fn settle<T>(outcome: SlotOutcome<T>, wanted: bool, errors: &mut Vec<String>) -> Option<T> {
    match outcome {
        Ok(value) => wanted.then_some(value),
        Err(e) => {
            warn!(agent = ?e.agent(), "智能体调用失败");
            errors.push(e.to_string());
            None
        }
    }
}
