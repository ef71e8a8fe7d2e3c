use serde::{Deserialize, Serialize};

use super::report::SearchParams;

/// `POST /api/scout` 的请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutRequest {
    pub params: SearchParams,
}

/// 405/500 响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
