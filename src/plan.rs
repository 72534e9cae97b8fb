// 编排计划 - 根据用户查询决定需要调用哪些智能体

use crate::protocol::{
    AttractionSearchParams, FlightSearchParams, ResearchType, TravelQuery, UserQuery,
};
use serde::Serialize;

pub const DEFAULT_ORIGIN: &str = "user location";
pub const DEFAULT_FLIGHT_DATE: &str = "next month";
pub const DEFAULT_PASSENGERS: u32 = 1;
pub const DEFAULT_ATTRACTION_LIMIT: u32 = 5;

/// 可由关键词触发的能力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Capability {
    Flights,
    Attractions,
}

/// 关键词规则：文本（小写后）包含任一关键词即触发对应能力
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub capability: Capability,
    pub keywords: &'static [&'static str],
}

impl KeywordRule {
    /// 子串匹配，不做分词（"visitor" 也会命中 "visit"）
    pub fn matches(&self, lowered_text: &str) -> bool {
        self.keywords.iter().any(|k| lowered_text.contains(k))
    }
}

pub const PLANNING_RULES: &[KeywordRule] = &[
    KeywordRule {
        capability: Capability::Flights,
        keywords: &["flight", "travel to", "get to", "fly to", "airline", "airport"],
    },
    KeywordRule {
        capability: Capability::Attractions,
        keywords: &["attraction", "see", "visit", "place", "destination"],
    },
];

/// 文本是否命中某项能力的任一规则
pub fn keyword_triggers(rules: &[KeywordRule], text: &str, capability: Capability) -> bool {
    let lowered = text.to_lowercase();
    rules
        .iter()
        .filter(|rule| rule.capability == capability)
        .any(|rule| rule.matches(&lowered))
}

/// 编排计划
///
/// 航班与景点是否需要由对应参数是否存在决定，综合资讯总是需要。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrchestrationPlan {
    pub flight_params: Option<FlightSearchParams>,
    pub attraction_params: Option<AttractionSearchParams>,
    pub research_params: TravelQuery,
}

impl OrchestrationPlan {
    pub fn needs_flights(&self) -> bool {
        self.flight_params.is_some()
    }

    pub fn needs_attractions(&self) -> bool {
        self.attraction_params.is_some()
    }

    pub fn needs_general_info(&self) -> bool {
        true
    }
}

/// 使用默认规则表生成计划
pub fn create_plan(query: &UserQuery) -> OrchestrationPlan {
    create_plan_with_rules(query, PLANNING_RULES)
}

/// 使用给定规则表生成计划（纯函数）
pub fn create_plan_with_rules(query: &UserQuery, rules: &[KeywordRule]) -> OrchestrationPlan {
    let has_dates = query.destination().is_some() && query.start_date().is_some();

    let needs_flights = has_dates || keyword_triggers(rules, &query.text, Capability::Flights);
    let needs_attractions = keyword_triggers(rules, &query.text, Capability::Attractions);

    let destination = query.destination().unwrap_or("").to_string();

    let flight_params = needs_flights.then(|| FlightSearchParams {
        from: query.origin().unwrap_or(DEFAULT_ORIGIN).to_string(),
        to: destination.clone(),
        date: query.start_date().unwrap_or(DEFAULT_FLIGHT_DATE).to_string(),
        return_date: query.end_date().map(str::to_string),
        passengers: Some(DEFAULT_PASSENGERS),
    });

    let attraction_params = needs_attractions.then(|| AttractionSearchParams {
        location: destination.clone(),
        category: (!query.interests().is_empty()).then(|| query.interests().join(", ")),
        limit: Some(DEFAULT_ATTRACTION_LIMIT),
    });

    let research_params = TravelQuery {
        destination: query.destination().map(str::to_string),
        query: query.text.clone(),
        research_type: if needs_attractions {
            ResearchType::Attractions
        } else {
            ResearchType::General
        },
    };

    OrchestrationPlan {
        flight_params,
        attraction_params,
        research_params,
    }
}
