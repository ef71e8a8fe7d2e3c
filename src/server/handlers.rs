use axum::{
    Form, Json,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::types::{ErrorEnvelope, ScoutRequest, SearchParams};
use crate::ui::{self, Dashboard, DirectSource, ReportSource, ServiceSource, html};

/// 页面表单
#[derive(Debug, Deserialize)]
pub struct ScoutForm {
    #[serde(default)]
    pub api_key: String,
    pub time_window_days: u32,
    pub max_price_usd: u32,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorEnvelope::new(message))).into_response()
}

/// `POST /api/scout`
///
/// 非POST请求在读取请求体之前直接返回405。凭据缺失或模型调用失败时返回
/// 200和种子数据，只有请求体无法解析时返回500。
pub async fn scout(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    if method != Method::POST {
        return error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    }

    let request_id = Uuid::new_v4();
    let request: ScoutRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(%request_id, "⚠️ 无法解析请求体: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let params = request.params;
    tracing::info!(
        %request_id,
        time_window_days = params.time_window_days,
        max_price_usd = params.max_price_usd,
        "🔍 收到调研请求"
    );

    match state
        .analyst
        .run_or_fallback(&params, &|msg: &str| tracing::info!(%request_id, "{}", msg))
        .await
    {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            tracing::error!(%request_id, "❌ 调研请求失败: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// `GET /` - 存在预生成报告时直接展示
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut dashboard = Dashboard::new();
    let baked = ui::load_baked_report(&state.config.latest_report_path()).await;

    let notice = match dashboard.on_mount(baked) {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!("⚠️ Failed to load local report: {}", e);
            Some(e.to_string())
        }
    };

    Html(html::render_page(&dashboard, notice.as_deref()))
}

/// `POST /` - 页面提交；填写了API Key时直连模型，否则走服务端链路
pub async fn submit_form(State(state): State<AppState>, Form(form): Form<ScoutForm>) -> Html<String> {
    let params = SearchParams::new(form.time_window_days, form.max_price_usd);
    let credential = form.api_key.trim().to_string();

    let source: Box<dyn ReportSource> = if credential.is_empty() {
        Box::new(ServiceSource::new(state.analyst.clone()))
    } else {
        Box::new(DirectSource::new(state.config.llm.clone()))
    };

    let mut dashboard = Dashboard::new();
    let notice = match dashboard
        .submit(source.as_ref(), &credential, params, &|msg: &str| {
            tracing::info!("{}", msg)
        })
        .await
    {
        Ok(()) => None,
        Err(e) => Some(e.to_string()),
    };

    Html(html::render_page(&dashboard, notice.as_deref()))
}

pub async fn healthz() -> &'static str {
    "ok"
}
