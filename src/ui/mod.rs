//! 展示层 - 输入收集、Idle/Loading/Ready 状态机与报告渲染

use std::path::Path;

use crate::error::ScoutError;
use crate::types::{ProviderResponse, ScoutReport, SearchParams};

pub mod html;
pub mod parse;
pub mod source;
pub mod terminal;

pub use parse::parse_report;
pub use source::{DirectSource, HttpSource, ReportSource, ServiceSource};

/// 进入Loading时显示的初始状态
pub const LOADING_STATUS: &str = "Scanning Niche Trends...";

/// 页面状态
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// 没有进行中的请求，也没有报告
    Idle,
    /// 请求进行中
    Loading { status: String },
    /// 报告就绪（可能是结构化数据、兜底数据或错误文本）
    Ready(ProviderResponse),
}

/// 单个用户会话的面板状态，当前报告在每次请求完成后整体替换
#[derive(Debug, Clone)]
pub struct Dashboard {
    state: ViewState,
    params: SearchParams,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            state: ViewState::Idle,
            params: SearchParams::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading { .. })
    }

    /// 页面加载时：存在预生成报告则直接进入Ready，不经过Loading
    pub fn on_mount(&mut self, baked: Option<ScoutReport>) -> Result<(), ScoutError> {
        if self.state != ViewState::Idle {
            return Ok(());
        }
        if let Some(report) = baked {
            self.state = ViewState::Ready(ProviderResponse::from_report(&report)?);
        }
        Ok(())
    }

    /// 提交一次调研请求
    ///
    /// 需要凭据而未提供时直接返回 `MissingCredential`，状态不变且不发起网络请求。
    /// 请求进行中再次提交会被忽略。其余情况结束后总是进入Ready，
    /// 失败时报告内容为错误文本。
    pub async fn submit(
        &mut self,
        source: &dyn ReportSource,
        credential: &str,
        params: SearchParams,
        on_status: &(dyn Fn(&str) + Sync),
    ) -> Result<(), ScoutError> {
        if self.is_loading() {
            return Ok(());
        }
        if source.requires_credential() && credential.trim().is_empty() {
            return Err(ScoutError::MissingCredential);
        }

        self.params = params;
        self.state = ViewState::Loading {
            status: LOADING_STATUS.to_string(),
        };
        on_status(LOADING_STATUS);

        let outcome = source.fetch(credential, &params, on_status).await;
        self.state = ViewState::Ready(match outcome {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("⚠️ 调研失败: {}", e);
                ProviderResponse::from_text(failure_text(&e))
            }
        });
        Ok(())
    }
}

/// 读取预生成报告，文件不存在或内容无法解析时返回 `None`
pub async fn load_baked_report(path: &Path) -> Option<ScoutReport> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("未找到预生成报告 {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str::<ScoutReport>(&content) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::warn!("⚠️ Failed to load local report {}: {}", path.display(), e);
            None
        }
    }
}

/// 错误以Markdown文本的形式作为报告内容展示
pub fn failure_text(error: &ScoutError) -> String {
    format!("### Failed to Scan\n\n{}", error)
}
