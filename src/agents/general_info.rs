// 综合资讯智能体 - 生成 markdown 风格的目的地指南

use super::{AgentSettings, PromptedGeneration, TravelAgent};
use crate::client::CompletionBackend;
use crate::config::DecodePolicy;
use crate::error::{AgentError, AgentKind};
use crate::protocol::{TravelQuery, TravelResponse};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = "You are a knowledgeable travel assistant. Provide detailed, accurate, and helpful travel information.
Format your responses in markdown with the following structure:
1. Start with a brief introduction about the destination
2. List top attractions with ** at the end of each name
3. Include descriptions for each attraction
4. Add relevant links to official websites or TripAdvisor
5. Include practical information like best times to visit, tips, etc.

Make sure to:
- Use proper markdown formatting
- Include specific details and facts
- Provide practical advice
- Include sources where possible
- Make the information engaging and easy to read";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2000;

pub const NO_INFORMATION: &str = "No information available.";

/// 综合资讯智能体
pub struct GeneralInfoAgent {
    generation: PromptedGeneration,
}

impl GeneralInfoAgent {
    pub fn new(backend: Arc<dyn CompletionBackend>, settings: AgentSettings) -> Self {
        Self {
            generation: PromptedGeneration::new(backend, settings),
        }
    }

    pub fn user_prompt(query: &TravelQuery) -> String {
        let destination = query
            .destination
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("the destination");

        format!(
            "Please provide detailed travel information about {} focusing on {}.
Query: {}

Please include:
1. A comprehensive overview
2. Top attractions with descriptions
3. Practical tips and advice
4. Best times to visit
5. Any relevant cultural information",
            destination,
            query.research_type.as_str(),
            query.query
        )
    }
}

#[async_trait]
impl TravelAgent for GeneralInfoAgent {
    type Params = TravelQuery;
    type Output = TravelResponse;

    fn kind(&self) -> AgentKind {
        AgentKind::GeneralInfo
    }

    fn name(&self) -> &str {
        "Travel Research Agent"
    }

    fn description(&self) -> &str {
        "Writes a destination guide using OpenAI"
    }

    async fn execute(&self, query: &TravelQuery) -> Result<TravelResponse, AgentError> {
        info!(
            destination = query.destination.as_deref().unwrap_or(""),
            research_type = query.research_type.as_str(),
            "开始生成目的地资讯"
        );

        let response = match self
            .generation
            .generate(SYSTEM_PROMPT, Self::user_prompt(query), None, TEMPERATURE, MAX_TOKENS)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "目的地资讯调用失败");
                return Err(AgentError::search_failed(self.kind()));
            }
        };

        // 正文为空属于可解析但无内容，按解码策略处理
        let content = match response.content.filter(|c| !c.trim().is_empty()) {
            Some(content) => content,
            None if self.generation.decode_policy() == DecodePolicy::Strict => {
                warn!("目的地资讯为空");
                return Err(AgentError::search_failed(self.kind()));
            }
            None => NO_INFORMATION.to_string(),
        };

        let sources = extract_sources(&content);
        info!(chars = content.len(), sources = sources.len(), "目的地资讯生成完成");

        Ok(TravelResponse {
            content,
            sources,
            error: None,
        })
    }
}

/// 从正文中提取不重复的 http(s) 链接，保持出现顺序
pub fn extract_sources(content: &str) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    let mut rest = content;

    while let Some(start) = find_url_start(rest) {
        let candidate = &rest[start..];
        let end = candidate
            .find(|c: char| c.is_whitespace() || matches!(c, ')' | ']' | '>' | '<' | '"' | '\'' | '`'))
            .unwrap_or(candidate.len());
        let url = candidate[..end].trim_end_matches(['.', ',', ';', ':', '!', '?', '*']);

        if url.len() > "https://".len() && !sources.iter().any(|s| s == url) {
            sources.push(url.to_string());
        }
        rest = &candidate[end.max(1)..];
    }

    sources
}

fn find_url_start(text: &str) -> Option<usize> {
    match (text.find("https://"), text.find("http://")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ScriptedBackend, ScriptedReply};
    use crate::protocol::ResearchType;

    fn query() -> TravelQuery {
        TravelQuery {
            destination: Some("Kyoto".to_string()),
            query: "temples and food".to_string(),
            research_type: ResearchType::General,
        }
    }

    fn agent_with(reply: ScriptedReply, policy: DecodePolicy) -> GeneralInfoAgent {
        let backend = Arc::new(ScriptedBackend::new().reply("text", reply));
        GeneralInfoAgent::new(
            backend,
            AgentSettings {
                decode_policy: policy,
                ..AgentSettings::default()
            },
        )
    }

    #[test]
    fn test_user_prompt_defaults_destination() {
        let mut q = query();
        assert!(GeneralInfoAgent::user_prompt(&q).starts_with(
            "Please provide detailed travel information about Kyoto focusing on general."
        ));

        q.destination = None;
        q.research_type = ResearchType::Attractions;
        let prompt = GeneralInfoAgent::user_prompt(&q);
        assert!(prompt.contains("about the destination focusing on attractions."));
        assert!(prompt.contains("Query: temples and food"));
    }

    #[test]
    fn test_extract_sources() {
        let content = "See [Kinkaku-ji](https://www.shokoku-ji.jp/kinkakuji/) and https://www.japan.travel.\n\
                       Again https://www.japan.travel, plus http://example.org/page?x=1";
        assert_eq!(
            extract_sources(content),
            vec![
                "https://www.shokoku-ji.jp/kinkakuji/".to_string(),
                "https://www.japan.travel".to_string(),
                "http://example.org/page?x=1".to_string(),
            ]
        );
        assert!(extract_sources("no links here").is_empty());
    }

    #[tokio::test]
    async fn test_generates_guide() {
        let agent = agent_with(
            ScriptedReply::Content("## Kyoto\nFushimi Inari**\nSee https://inari.jp".to_string()),
            DecodePolicy::Lenient,
        );

        let response = agent.execute(&query()).await.unwrap();
        assert!(response.content.starts_with("## Kyoto"));
        assert_eq!(response.sources, vec!["https://inari.jp".to_string()]);
        assert_eq!(response.error, None);
    }

    #[tokio::test]
    async fn test_empty_content_becomes_placeholder() {
        let agent = agent_with(ScriptedReply::Empty, DecodePolicy::Lenient);
        let response = agent.execute(&query()).await.unwrap();
        assert_eq!(response.content, NO_INFORMATION);
        assert!(response.sources.is_empty());
    }

    #[tokio::test]
    async fn test_call_failure_is_an_error_under_any_policy() {
        for policy in [DecodePolicy::Lenient, DecodePolicy::Strict] {
            let agent = agent_with(ScriptedReply::Failure("503".to_string()), policy);
            let err = agent.execute(&query()).await.unwrap_err();
            assert_eq!(err, AgentError::search_failed(AgentKind::GeneralInfo));
            assert_eq!(err.to_string(), "Failed to fetch travel information");
        }
    }

    #[tokio::test]
    async fn test_policies_differ_only_on_empty_content() {
        let lenient = agent_with(ScriptedReply::Empty, DecodePolicy::Lenient);
        assert_eq!(lenient.execute(&query()).await.unwrap().content, NO_INFORMATION);

        let strict = agent_with(ScriptedReply::Empty, DecodePolicy::Strict);
        assert_eq!(
            strict.execute(&query()).await.unwrap_err(),
            AgentError::search_failed(AgentKind::GeneralInfo)
        );

        // 有正文时两种策略结果一致
        let guide = ScriptedReply::Content("## Kyoto\nhttps://kyoto.travel".to_string());
        let lenient = agent_with(guide.clone(), DecodePolicy::Lenient);
        let strict = agent_with(guide, DecodePolicy::Strict);
        assert_eq!(
            lenient.execute(&query()).await.unwrap(),
            strict.execute(&query()).await.unwrap()
        );
    }
}
