//! 展示层获取报告的几种途径

use async_trait::async_trait;

use crate::analyst::{AnalystService, PROGRESS_MESSAGE};
use crate::config::LLMConfig;
use crate::error::ScoutError;
use crate::types::{ErrorEnvelope, ProviderResponse, ScoutRequest, SearchParams};

#[async_trait]
pub trait ReportSource: Send + Sync {
    /// 是否需要用户提供API Key
    fn requires_credential(&self) -> bool {
        false
    }

    async fn fetch(
        &self,
        credential: &str,
        params: &SearchParams,
        on_progress: &(dyn for<'a> Fn(&'a str) + Sync),
    ) -> Result<ProviderResponse, ScoutError>;
}

/// 进程内调用，与 `POST /api/scout` 走同一条带兜底的链路
pub struct ServiceSource {
    service: AnalystService,
}

impl ServiceSource {
    pub fn new(service: AnalystService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ReportSource for ServiceSource {
    async fn fetch(
        &self,
        _credential: &str,
        params: &SearchParams,
        on_progress: &(dyn for<'a> Fn(&'a str) + Sync),
    ) -> Result<ProviderResponse, ScoutError> {
        self.service
            .run_or_fallback(params, on_progress)
            .await
    }
}

/// 客户端直连：使用用户输入的API Key直接调用模型，失败时不兜底
pub struct DirectSource {
    llm: LLMConfig,
}

impl DirectSource {
    pub fn new(llm: LLMConfig) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ReportSource for DirectSource {
    fn requires_credential(&self) -> bool {
        true
    }

    async fn fetch(
        &self,
        credential: &str,
        params: &SearchParams,
        on_progress: &(dyn for<'a> Fn(&'a str) + Sync),
    ) -> Result<ProviderResponse, ScoutError> {
        let llm = LLMConfig {
            api_key: credential.trim().to_string(),
            ..self.llm.clone()
        };
        let service = AnalystService::new(&llm)?;
        service.run(params, on_progress).await
    }
}

/// 调用远端的 `POST /api/scout`
pub struct HttpSource {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ReportSource for HttpSource {
    async fn fetch(
        &self,
        _credential: &str,
        params: &SearchParams,
        on_progress: &(dyn for<'a> Fn(&'a str) + Sync),
    ) -> Result<ProviderResponse, ScoutError> {
        on_progress(PROGRESS_MESSAGE);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&ScoutRequest { params: *params })
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if status.is_success() {
            return Ok(serde_json::from_str::<ProviderResponse>(&raw)?);
        }

        let message = serde_json::from_str::<ErrorEnvelope>(&raw)
            .map(|envelope| envelope.error)
            .unwrap_or(raw);
        Err(ScoutError::Provider {
            status: status.as_u16(),
            message,
        })
    }
}
