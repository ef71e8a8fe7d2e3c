//! 调研请求服务 - 构造提示词、调用模型、在失败时替换为种子数据

use std::sync::Arc;

use crate::config::LLMConfig;
use crate::error::ScoutError;
use crate::llm::{GeminiClient, GenerationRequest, ReportProvider};
use crate::seed;
use crate::types::{ProviderResponse, SearchParams};

pub mod prompts;

pub use prompts::PromptTemplate;

/// 调用模型前发出的唯一一条进度消息
pub const PROGRESS_MESSAGE: &str = "Scanning for high-novelty viral signals...";

#[derive(Clone)]
pub struct AnalystService {
    provider: Arc<dyn ReportProvider>,
    llm: LLMConfig,
}

impl AnalystService {
    /// 使用Gemini客户端创建服务，凭据取自 `llm.api_key`
    pub fn new(llm: &LLMConfig) -> Result<Self, ScoutError> {
        let client = GeminiClient::new(llm)?;
        Ok(Self::with_provider(Arc::new(client), llm.clone()))
    }

    pub fn with_provider(provider: Arc<dyn ReportProvider>, llm: LLMConfig) -> Self {
        Self { provider, llm }
    }

    pub fn has_credential(&self) -> bool {
        self.llm.has_credential()
    }

    /// 根据配置档与参数构造生成请求
    pub fn build_request(&self, params: &SearchParams) -> GenerationRequest {
        let template = PromptTemplate::for_profile(self.llm.profile, params);
        GenerationRequest {
            model: self.llm.effective_model(),
            system_instruction: template.system_instruction,
            prompt: template.prompt,
            enable_search: self.llm.enable_search,
            thinking_budget: self.llm.effective_thinking_budget(),
            temperature: self.llm.effective_temperature(),
        }
    }

    /// 执行一次调研，不重试、不缓存
    pub async fn run(
        &self,
        params: &SearchParams,
        on_progress: &(dyn Fn(&str) + Sync),
    ) -> Result<ProviderResponse, ScoutError> {
        if !self.has_credential() {
            return Err(ScoutError::MissingCredential);
        }
        params.validate()?;

        let request = self.build_request(params);
        on_progress(PROGRESS_MESSAGE);

        match self.provider.generate(&request).await {
            Ok(response) => {
                tracing::info!(
                    model = %request.model,
                    chars = response.text.len(),
                    "✅ 模型调研完成"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::error!(model = %request.model, "❌ Scout Failure: {}", e);
                Err(e)
            }
        }
    }

    /// 执行调研，凭据缺失或调用失败时返回打乱后的种子数据
    pub async fn run_or_fallback(
        &self,
        params: &SearchParams,
        on_progress: &(dyn Fn(&str) + Sync),
    ) -> Result<ProviderResponse, ScoutError> {
        params.validate()?;

        match self.run(params, on_progress).await {
            Ok(response) => Ok(response),
            Err(ScoutError::MissingCredential) => {
                tracing::info!("🔑 未配置服务端API Key，返回种子数据");
                seed::fallback_response(params)
            }
            Err(e) => {
                tracing::warn!("⚠️ API Error, serving dynamic fallback: {}", e);
                seed::fallback_response(params)
            }
        }
    }
}
