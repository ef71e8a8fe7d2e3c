use thiserror::Error;

/// 调研链路上的错误
///
/// 模型返回文本无法解析为报告不算错误，展示层会降级为原文显示。
#[derive(Debug, Error)]
pub enum ScoutError {
    /// 未提供API Key，在发起任何网络请求之前就失败
    #[error("Please enter a Gemini API Key to start scouting.")]
    MissingCredential,

    #[error("invalid search parameters: {0}")]
    InvalidParams(String),

    #[error("request to the generation provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 模型服务返回了非2xx响应
    #[error("{message} (status {status})")]
    Provider { status: u16, message: String },

    #[error("The scout agent failed to find viral gaps.")]
    EmptyResponse,

    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ScoutError {
    /// 是否属于在发起调用前就能判定的输入错误
    pub fn is_input_error(&self) -> bool {
        matches!(self, ScoutError::MissingCredential | ScoutError::InvalidParams(_))
    }
}
