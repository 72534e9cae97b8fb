// 景点查询智能体 - 生成景点列表并为每个景点推导示意图片

use super::{decode_collection, AgentSettings, PromptedGeneration, TravelAgent};
use crate::client::CompletionBackend;
use crate::error::{AgentError, AgentKind};
use crate::protocol::{AttractionResult, AttractionSearchParams, OutputContract};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = "You are a travel attractions expert. Provide detailed information about attractions based on the user's request.
Make sure to:
- Provide accurate and detailed descriptions
- Use realistic ratings and review counts
- Include a mix of free and paid attractions
- Cover different types of attractions (museums, parks, landmarks, etc.)
- Return 5-7 attractions in the array
- Do not include imageUrl in the response, it will be added later";

const CONTRACT_NAME: &str = "returnAttractions";
const RESULT_KEY: &str = "attractions";
const DEFAULT_LIMIT: u32 = 5;
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1500;

/// 根据景点名称推导固定的示意图片地址
///
/// 种子是名称各 UTF-16 码元之和，同名景点总是得到同一张图片。
pub fn attraction_image_url(name: &str) -> String {
    let seed: u64 = name.encode_utf16().map(u64::from).sum();
    format!("https://picsum.photos/seed/{}/800/600", seed)
}

/// 景点查询智能体
pub struct AttractionAgent {
    generation: PromptedGeneration,
}

impl AttractionAgent {
    pub fn new(backend: Arc<dyn CompletionBackend>, settings: AgentSettings) -> Self {
        Self {
            generation: PromptedGeneration::new(backend, settings),
        }
    }

    /// 结构化输出约定：景点列表（不含图片地址）
    pub fn output_contract() -> OutputContract {
        OutputContract {
            name: CONTRACT_NAME.to_string(),
            description: "Returns a list of attractions".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "attractions": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "rating": { "type": "number" },
                                "reviewCount": { "type": "number" },
                                "priceLevel": { "type": "string" },
                                "description": { "type": "string" },
                                "url": { "type": "string" },
                                "categories": {
                                    "type": "array",
                                    "items": { "type": "string" }
                                }
                            },
                            "required": [
                                "name", "rating", "reviewCount", "priceLevel",
                                "description", "url", "categories"
                            ]
                        }
                    }
                },
                "required": ["attractions"]
            }),
        }
    }

    pub fn user_prompt(params: &AttractionSearchParams) -> String {
        let focus = params
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|c| format!(" focusing on {}", c))
            .unwrap_or_default();

        format!(
            "Please provide information about top attractions in {}{}. Limit to {} attractions.",
            params.location,
            focus,
            params.limit.unwrap_or(DEFAULT_LIMIT)
        )
    }
}

#[async_trait]
impl TravelAgent for AttractionAgent {
    type Params = AttractionSearchParams;
    type Output = Vec<AttractionResult>;

    fn kind(&self) -> AgentKind {
        AgentKind::Attractions
    }

    fn name(&self) -> &str {
        "TripAdvisor Search Agent"
    }

    fn description(&self) -> &str {
        "Searches for attractions and reviews using OpenAI"
    }

    async fn execute(
        &self,
        params: &AttractionSearchParams,
    ) -> Result<Vec<AttractionResult>, AgentError> {
        info!(location = %params.location, "开始查询景点");

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
                warn!(error = %e, "景点查询调用失败");
                AgentError::search_failed(self.kind())
            })?;

        let mut attractions: Vec<AttractionResult> = decode_collection(
            response.function_arguments.as_deref(),
            RESULT_KEY,
            self.generation.decode_policy(),
        )
        .map_err(|e| {
            warn!(error = %e, "景点结果解析失败");
            AgentError::search_failed(self.kind())
        })?;

        // 图片地址总是本地推导，覆盖模型可能给出的值
        for attraction in &mut attractions {
            attraction.image_url = attraction_image_url(&attraction.name);
        }

        info!(count = attractions.len(), "景点查询完成");
        Ok(attractions)
    }
}
