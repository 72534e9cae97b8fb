// 协议定义 - 用户查询、各智能体参数与结果、模型请求

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ========== 用户查询 ==========

/// 出行日期区间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// 用户偏好
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// 用户一次提交的出行查询
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserQuery {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl UserQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_dates(mut self, start: impl Into<String>, end: Option<String>) -> Self {
        self.dates = Some(DateRange {
            start: start.into(),
            end,
        });
        self
    }

    pub fn with_interests(mut self, interests: Vec<String>) -> Self {
        self.preferences.get_or_insert_with(Preferences::default).interests = interests;
        self
    }

    /// 目的地（空字符串视为未填写）
    pub fn destination(&self) -> Option<&str> {
        non_empty(self.location.as_deref())
    }

    /// 出发地（空字符串视为未填写）
    pub fn origin(&self) -> Option<&str> {
        non_empty(self.from.as_deref())
    }

    pub fn start_date(&self) -> Option<&str> {
        non_empty(self.dates.as_ref().map(|d| d.start.as_str()))
    }

    pub fn end_date(&self) -> Option<&str> {
        non_empty(self.dates.as_ref().and_then(|d| d.end.as_deref()))
    }

    pub fn interests(&self) -> &[String] {
        self.preferences
            .as_ref()
            .map(|p| p.interests.as_slice())
            .unwrap_or(&[])
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ========== 智能体参数 ==========

/// 航班查询参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchParams {
    pub from: String,
    pub to: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passengers: Option<u32>,
}

/// 景点查询参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionSearchParams {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// 综合资讯的侧重点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchType {
    Attractions,
    Hotels,
    Restaurants,
    General,
}

impl ResearchType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResearchType::Attractions => "attractions",
            ResearchType::Hotels => "hotels",
            ResearchType::Restaurants => "restaurants",
            ResearchType::General => "general",
        }
    }
}

/// 综合资讯查询参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub query: String,
    #[serde(rename = "type")]
    pub research_type: ResearchType,
}

// ========== 智能体结果 ==========

/// 航班起降信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightEndpoint {
    pub time: String,
    pub airport: String,
}

/// 单个航班
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightResult {
    pub airline: String,
    pub flight_number: String,
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    pub price: f64,
    pub currency: String,
    pub stops: u32,
}

/// 单个景点，`image_url` 由本地根据名称推导
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttractionResult {
    pub name: String,
    pub rating: f64,
    pub review_count: u64,
    pub price_level: String,
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub image_url: String,
}

/// 综合资讯（markdown 风格文本）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelResponse {
    pub content: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 汇总结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flights: Option<Vec<FlightResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attractions: Option<Vec<AttractionResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_info: Option<TravelResponse>,
    #[serde(default)]
    pub errors: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

// ========== 模型请求 ==========

/// 对话消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// 结构化输出约定（以函数定义的形式交给模型）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputContract {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// 一次补全请求
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub output_contract: Option<OutputContract>,
}

impl CompletionRequest {
    /// 结构化约定名，纯文本请求为 None
    pub fn contract_name(&self) -> Option<&str> {
        self.output_contract.as_ref().map(|c| c.name.as_str())
    }
}

/// 一次补全响应
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletionResponse {
    pub content: Option<String>,
    /// 结构化约定对应的参数原文（JSON 字符串）
    pub function_arguments: Option<String>,
}
