//! 模型客户端 - 对接 Gemini `generateContent` 接口

use async_trait::async_trait;

use crate::config::LLMConfig;
use crate::error::ScoutError;
use crate::types::ProviderResponse;

pub mod types;

use types::{
    ApiErrorEnvelope, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ThinkingConfig, Tool,
};

/// 一次生成调用所需的全部参数
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub system_instruction: String,
    /// 唯一的一轮用户消息
    pub prompt: String,
    /// 是否启用Google搜索增强
    pub enable_search: bool,
    pub thinking_budget: Option<u32>,
    pub temperature: Option<f64>,
}

/// 生成服务的统一接口
#[async_trait]
pub trait ReportProvider: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<ProviderResponse, ScoutError>;
}

/// Gemini REST客户端，凭据在构造时传入，之后不再变化
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
}

impl GeminiClient {
    pub fn new(config: &LLMConfig) -> Result<Self, ScoutError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            api_key: config.api_key.trim().to_string(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base_url, model)
    }

    /// 构造请求体
    pub fn build_body(request: &GenerationRequest) -> GenerateContentRequest {
        let thinking_config = request
            .thinking_budget
            .map(|thinking_budget| ThinkingConfig { thinking_budget });

        let generation_config = if thinking_config.is_some() || request.temperature.is_some() {
            Some(GenerationConfig {
                temperature: request.temperature,
                thinking_config,
            })
        } else {
            None
        };

        let tools = if request.enable_search {
            vec![Tool::google_search()]
        } else {
            vec![]
        };

        GenerateContentRequest {
            contents: vec![Content::user(&request.prompt)],
            system_instruction: Some(Content::system(&request.system_instruction)),
            tools,
            generation_config,
        }
    }
}

#[async_trait]
impl ReportProvider for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<ProviderResponse, ScoutError> {
        if self.api_key.is_empty() {
            return Err(ScoutError::MissingCredential);
        }

        let body = Self::build_body(request);
        tracing::debug!(model = %request.model, search = request.enable_search, "📡 调用模型服务");

        let response = self
            .http
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                .ok()
                .map(|envelope| envelope.error.message)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| {
                    if raw.trim().is_empty() {
                        status.to_string()
                    } else {
                        raw
                    }
                });
            return Err(ScoutError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        payload.into_provider_response()
    }
}
