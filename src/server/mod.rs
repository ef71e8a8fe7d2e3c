//! HTTP服务 - `POST /api/scout` 接口与浏览器页面

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{any, get},
};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::analyst::AnalystService;
use crate::config::Config;
use crate::error::ScoutError;

pub mod handlers;

/// 所有请求共享的只读状态
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analyst: AnalystService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ScoutError> {
        let analyst = AnalystService::new(&config.llm)?;
        Ok(Self::with_analyst(config, analyst))
    }

    pub fn with_analyst(config: Config, analyst: AnalystService) -> Self {
        Self {
            config: Arc::new(config),
            analyst,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let data_dir = state.config.server.static_dir.join("data");

    Router::new()
        .route("/", get(handlers::index).post(handlers::submit_form))
        .route("/api/scout", any(handlers::scout))
        .route("/healthz", get(handlers::healthz))
        .nest_service("/data", ServeDir::new(data_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 启动HTTP服务，Ctrl-C 时优雅退出
pub async fn serve(config: Config) -> Result<()> {
    let bind = config.server.bind.clone();
    let state = AppState::new(config)?;

    if state.analyst.has_credential() {
        tracing::info!(
            model = %state.config.llm.effective_model(),
            profile = %state.config.llm.profile,
            "🔑 已加载服务端API Key"
        );
    } else {
        tracing::warn!("⚠️ 未配置 GEMINI_API_KEY，所有请求都将返回种子数据");
    }

    let listener = TcpListener::bind(&bind)
        .await
        .context(format!("Failed to bind {}", bind))?;
    tracing::info!("🚀 Viral Scout listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("👋 Viral Scout stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ 无法监听退出信号: {}", e);
    }
}
