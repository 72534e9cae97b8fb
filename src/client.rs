// 模型客户端实现 - OpenAI 兼容的 chat/completions 接口

use crate::config::Config;
use crate::error::ClientError;
use crate::protocol::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// 补全后端（各智能体构造时注入）
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ClientError>;
}

#[async_trait]
impl<T: CompletionBackend + ?Sized> CompletionBackend for Arc<T> {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ClientError> {
        (**self).complete(request).await
    }
}

/// HTTP 模型客户端
pub struct ModelClient {
    api_key: String,
    client: ReqwestClient,
    base_url: String,
}

impl ModelClient {
    /// 创建模型客户端（自定义配置）
    pub fn new_with_config(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new_with_config(
            config.api_key.clone(),
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionBackend for ModelClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ClientError> {
        let request_body = build_request_body(&request);

        debug!(
            model = %request.model,
            contract = request.contract_name().unwrap_or("text"),
            "发送补全请求"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "API 请求失败");
            return Err(ClientError::Status { status, body });
        }

        let response_json: Value = response.json().await?;
        parse_response(&response_json)
    }
}

/// 构建请求体；有结构化约定时强制模型调用该函数
pub fn build_request_body(request: &CompletionRequest) -> Value {
    let mut body = json!({
        "model": request.model,
        "messages": request.messages,
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
        "stream": false
    });

    if let Some(contract) = &request.output_contract {
        body["functions"] = json!([contract]);
        body["function_call"] = json!({ "name": contract.name });
    }

    body
}

/// 解析 API 响应
pub fn parse_response(response: &Value) -> Result<CompletionResponse, ClientError> {
    let message = response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .ok_or_else(|| ClientError::InvalidResponse("response has no choices".to_string()))?;

    let content = message
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string);

    // 旧式 function_call 优先，其次兼容 tool_calls 形式
    let arguments = message
        .get("function_call")
        .and_then(|call| call.get("arguments"))
        .or_else(|| {
            message
                .get("tool_calls")
                .and_then(|calls| calls.get(0))
                .and_then(|call| call.get("function"))
                .and_then(|func| func.get("arguments"))
        });

    // 参数可能是 JSON 字符串，也可能已经是对象
    let function_arguments = match arguments {
        Some(Value::String(raw)) => Some(raw.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };

    Ok(CompletionResponse {
        content,
        function_arguments,
    })
}

// ========== 脚本化后端（测试与演示用） ==========

/// 预设回复
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// 结构化参数原文
    Arguments(String),
    /// 纯文本内容
    Content(String),
    /// 合法响应但没有任何载荷
    Empty,
    /// 模拟调用失败
    Failure(String),
    /// 模拟后端内部崩溃
    Panic,
}

/// 按结构化约定名返回预设回复的后端，纯文本请求使用键 `"text"`
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: HashMap<String, ScriptedReply>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, contract: &str, reply: ScriptedReply) -> Self {
        self.replies.insert(contract.to_string(), reply);
        self
    }

    /// 已收到的请求（按到达顺序）
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ClientError> {
        let key = request.contract_name().unwrap_or("text").to_string();
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);

        match self.replies.get(&key) {
            Some(ScriptedReply::Arguments(raw)) => Ok(CompletionResponse {
                content: None,
                function_arguments: Some(raw.clone()),
            }),
            Some(ScriptedReply::Content(text)) => Ok(CompletionResponse {
                content: Some(text.clone()),
                function_arguments: None,
            }),
            Some(ScriptedReply::Empty) => Ok(CompletionResponse::default()),
            Some(ScriptedReply::Failure(reason)) => Err(ClientError::Status {
                status: 500,
                body: reason.clone(),
            }),
            Some(ScriptedReply::Panic) => panic!("scripted backend crashed on {}", key),
            None => Err(ClientError::InvalidResponse(format!(
                "no scripted reply for {}",
                key
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ChatMessage, OutputContract};

    fn structured_request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: 0.7,
            max_tokens: 1000,
            output_contract: Some(OutputContract {
                name: "returnFlights".to_string(),
                description: "Returns a list of flight options".to_string(),
                parameters: json!({"type": "object"}),
            }),
        }
    }

    #[test]
    fn test_model_client_creation() {
        let client = ModelClient::new_with_config(
            "test-key".to_string(),
            "https://api.openai.com/v1/".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_request_body_forces_contract() {
        let body = build_request_body(&structured_request());

        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["functions"][0]["name"], "returnFlights");
        assert_eq!(body["function_call"]["name"], "returnFlights");
    }

    #[test]
    fn test_text_request_has_no_functions() {
        let mut request = structured_request();
        request.output_contract = None;
        let body = build_request_body(&request);

        assert!(body.get("functions").is_none());
        assert!(body.get("function_call").is_none());
    }

    #[test]
    fn test_parse_function_call_arguments() {
        let response = json!({
            "choices": [{
                "message": {
                    "content": null,
                    "function_call": {"name": "returnFlights", "arguments": "{\"flights\":[]}"}
                }
            }]
        });

        let parsed = parse_response(&response).unwrap();
        assert_eq!(parsed.content, None);
        assert_eq!(parsed.function_arguments.as_deref(), Some("{\"flights\":[]}"));
    }

    #[test]
    fn test_parse_tool_call_object_arguments() {
        let response = json!({
            "choices": [{
                "message": {
                    "content": "",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "returnAttractions", "arguments": {"attractions": []}}
                    }]
                }
            }]
        });

        let parsed = parse_response(&response).unwrap();
        assert_eq!(parsed.function_arguments.as_deref(), Some("{\"attractions\":[]}"));
    }

    #[test]
    fn test_parse_missing_choices_is_error() {
        let err = parse_response(&json!({"error": "boom"})).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_scripted_backend_records_requests() {
        let backend = ScriptedBackend::new()
            .reply("returnFlights", ScriptedReply::Arguments("{}".to_string()));

        let response = backend.complete(structured_request()).await.unwrap();
        assert_eq!(response.function_arguments.as_deref(), Some("{}"));

        let mut text_request = structured_request();
        text_request.output_contract = None;
        assert!(backend.complete(text_request).await.is_err());

        assert_eq!(backend.requests().len(), 2);
    }
}
