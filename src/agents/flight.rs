// 航班查询智能体 - 由模型按结构化约定生成航班选项

use super::{decode_collection, AgentSettings, PromptedGeneration, TravelAgent};
use crate::client::CompletionBackend;
use crate::error::{AgentError, AgentKind};
use crate::protocol::{FlightResult, FlightSearchParams, OutputContract};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = "You are a flight search assistant. Provide realistic flight information based on the user's request.
Make sure to:
- Use realistic airline names and flight numbers
- Consider time zones for arrival times
- Provide reasonable prices based on the route
- Include a mix of direct and connecting flights
- Return 3-5 flights in the array";

const CONTRACT_NAME: &str = "returnFlights";
const RESULT_KEY: &str = "flights";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1000;

/// 航班查询智能体
pub struct FlightAgent {
    generation: PromptedGeneration,
}

impl FlightAgent {
    pub fn new(backend: Arc<dyn CompletionBackend>, settings: AgentSettings) -> Self {
        Self {
            generation: PromptedGeneration::new(backend, settings),
        }
    }

    /// 结构化输出约定：航班列表
    pub fn output_contract() -> OutputContract {
        let endpoint = json!({
            "type": "object",
            "properties": {
                "time": { "type": "string" },
                "airport": { "type": "string" }
            },
            "required": ["time", "airport"]
        });

        OutputContract {
            name: CONTRACT_NAME.to_string(),
            description: "Returns a list of flight options".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "flights": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "airline": { "type": "string" },
                                "flightNumber": { "type": "string" },
                                "departure": endpoint,
                                "arrival": endpoint,
                                "price": { "type": "number" },
                                "currency": { "type": "string" },
                                "stops": { "type": "number" }
                            },
                            "required": [
                                "airline", "flightNumber", "departure", "arrival",
                                "price", "currency", "stops"
                            ]
                        }
                    }
                },
                "required": ["flights"]
            }),
        }
    }

    pub fn user_prompt(params: &FlightSearchParams) -> String {
        let return_leg = params
            .return_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| format!(" with return on {}", d))
            .unwrap_or_default();

        format!(
            "Please provide flight options from {} to {} on {}{} for {} passenger(s).",
            params.from,
            params.to,
            params.date,
            return_leg,
            params.passengers.unwrap_or(1)
        )
    }
}

#[async_trait]
impl TravelAgent for FlightAgent {
    type Params = FlightSearchParams;
    type Output = Vec<FlightResult>;

    fn kind(&self) -> AgentKind {
        AgentKind::Flights
    }

    fn name(&self) -> &str {
        "Flight Search Agent"
    }

    fn description(&self) -> &str {
        "Searches for flight information using OpenAI"
    }

    async fn execute(&self, params: &FlightSearchParams) -> Result<Vec<FlightResult>, AgentError> {
        info!(from = %params.from, to = %params.to, date = %params.date, "开始查询航班");

        let response = self
            .generation
            .generate(
                SYSTEM_PROMPT,
                Self::user_prompt(params),
                Some(Self::output_contract()),
                TEMPERATURE,
                MAX_TOKENS,
            )
            .await
            .map_err(|e| {
                warn!(error = %e, "航班查询调用失败");
                AgentError::search_failed(self.kind())
            })?;

        let flights: Vec<FlightResult> = decode_collection(
            response.function_arguments.as_deref(),
            RESULT_KEY,
            self.generation.decode_policy(),
        )
        .map_err(|e| {
            warn!(error = %e, "航班结果解析失败");
            AgentError::search_failed(self.kind())
        })?;

        info!(count = flights.len(), "航班查询完成");
        Ok(flights)
    }
}
