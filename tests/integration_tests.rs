use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;

use viral_scout::Config;
use viral_scout::server::{AppState, build_router};
use viral_scout::types::{ProviderResponse, ScoutReport, SearchParams};
use viral_scout::ui::{Dashboard, DirectSource, HttpSource, ViewState, parse_report};

/// 模拟的Gemini服务收到的请求
#[derive(Debug, Clone)]
struct RecordedCall {
    path: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct FakeGemini {
    status: StatusCode,
    reply: Value,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

async fn fake_generate(
    State(fake): State<FakeGemini>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    fake.calls.lock().unwrap().push(RecordedCall {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (fake.status, Json(fake.reply.clone())).into_response()
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// 启动模拟的Gemini服务，返回API基地址
async fn spawn_fake_gemini(
    status: StatusCode,
    reply: Value,
) -> (String, Arc<Mutex<Vec<RecordedCall>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeGemini {
        status,
        reply,
        calls: calls.clone(),
    };
    let router = Router::new().fallback(fake_generate).with_state(fake);
    let addr = spawn(router).await;
    (format!("http://{}/v1beta", addr), calls)
}

async fn spawn_scout(config: Config) -> String {
    let state = AppState::new(config).unwrap();
    let addr = spawn(build_router(state)).await;
    format!("http://{}", addr)
}

fn config_for(api_base_url: &str, api_key: &str, static_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.llm.api_base_url = api_base_url.to_string();
    config.llm.api_key = api_key.to_string();
    config.server.static_dir = static_dir.path().to_path_buf();
    config
}

fn grounded_reply() -> Value {
    let report = json!({
        "top_5": [{
            "product_name": "Seattle Ultrasonics C-200 Knife",
            "brand": "Seattle Ultrasonics",
            "category": "Home/Kitchen",
            "price_usd": 45,
            "virality_score": 94,
            "buy_link": "https://seattleultrasonics.com"
        }],
        "watchlist": [],
        "logic_breakdown": "Grounded search across TikTok trends"
    });
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    {"text": "Checking marketplaces first.", "thought": true},
                    {"text": format!("```json\n{}\n```", report)}
                ]
            },
            "groundingMetadata": {
                "groundingChunks": [
                    {"web": {"uri": "https://www.tiktok.com/@gadgets/video/1", "title": "TikTok"}},
                    {"retrievedContext": {"uri": "ignored"}}
                ],
                "webSearchQueries": ["ultrasonic knife viral"]
            }
        }]
    })
}

const SCOUT_BODY: &str = r#"{"params": {"time_window_days": 15, "max_price_usd": 50}}"#;

#[tokio::test]
async fn test_non_post_is_rejected() {
    let static_dir = TempDir::new().unwrap();
    let base = spawn_scout(config_for("http://127.0.0.1:1/v1beta", "k", &static_dir)).await;
    let http = reqwest::Client::new();

    let response = http
        .get(format!("{}/api/scout", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Method not allowed"}));

    let response = http
        .put(format!("{}/api/scout", base))
        .body(SCOUT_BODY)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_live_report_passes_grounding_through() {
    let (api_base, calls) = spawn_fake_gemini(StatusCode::OK, grounded_reply()).await;
    let static_dir = TempDir::new().unwrap();
    let base = spawn_scout(config_for(&api_base, "server-key", &static_dir)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/scout", base))
        .header("content-type", "application/json")
        .body(SCOUT_BODY)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("application/json")
    );

    let envelope: ProviderResponse = response.json().await.unwrap();
    assert!(!envelope.text.contains("Checking marketplaces"));
    let report = parse_report(&envelope.text).unwrap();
    assert_eq!(report.top_5[0].virality_score, 94);

    let grounding = envelope.grounding.unwrap();
    let sources: Vec<_> = grounding.web_sources().collect();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].uri, "https://www.tiktok.com/@gadgets/video/1");

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.path, "/v1beta/models/gemini-3-pro-preview:generateContent");
    assert_eq!(call.api_key.as_deref(), Some("server-key"));
    assert_eq!(call.body["tools"], json!([{"googleSearch": {}}]));
    assert_eq!(
        call.body["generationConfig"]["thinkingConfig"]["thinkingBudget"],
        15000
    );
    let prompt = call.body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("last 15 days"));
}

#[tokio::test]
async fn test_provider_failure_serves_seed_fallback() {
    let (api_base, calls) = spawn_fake_gemini(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}),
    )
    .await;
    let static_dir = TempDir::new().unwrap();
    let base = spawn_scout(config_for(&api_base, "server-key", &static_dir)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/scout", base))
        .body(SCOUT_BODY)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert!(body["grounding"].is_null());
    let report: ScoutReport = serde_json::from_str(body["text"].as_str().unwrap()).unwrap();
    assert!(!report.top_5.is_empty());
    assert!(report.top_5.len() <= 5);
    assert!(report.logic_breakdown.contains("last 15 days"));
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_server_credential_serves_seed_fallback() {
    let (api_base, calls) = spawn_fake_gemini(StatusCode::OK, grounded_reply()).await;
    let static_dir = TempDir::new().unwrap();
    let base = spawn_scout(config_for(&api_base, "", &static_dir)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/scout", base))
        .body(SCOUT_BODY)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let envelope: ProviderResponse = response.json().await.unwrap();
    assert!(parse_report(&envelope.text).is_some());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_server_error() {
    let static_dir = TempDir::new().unwrap();
    let base = spawn_scout(config_for("http://127.0.0.1:1/v1beta", "k", &static_dir)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/scout", base))
        .body("{\"params\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_http_source_drives_dashboard() {
    let (api_base, _) = spawn_fake_gemini(StatusCode::OK, grounded_reply()).await;
    let static_dir = TempDir::new().unwrap();
    let base = spawn_scout(config_for(&api_base, "server-key", &static_dir)).await;

    let source = HttpSource::new(format!("{}/api/scout", base));
    let mut dashboard = Dashboard::new();
    dashboard
        .submit(&source, "", SearchParams::new(7, 50), &|_: &str| {})
        .await
        .unwrap();

    match dashboard.state() {
        ViewState::Ready(response) => {
            assert!(parse_report(&response.text).is_some());
            assert!(response.grounding.is_some());
        }
        other => panic!("unexpected state: {:?}", other),
    }
}

#[tokio::test]
async fn test_direct_source_reports_provider_message() {
    let (api_base, calls) = spawn_fake_gemini(
        StatusCode::BAD_REQUEST,
        json!({"error": {"code": 400, "message": "API key not valid. Please pass a valid API key."}}),
    )
    .await;
    let mut config = Config::default();
    config.llm.api_base_url = api_base;

    let source = DirectSource::new(config.llm.clone());
    let mut dashboard = Dashboard::new();
    dashboard
        .submit(&source, "AIza-user", SearchParams::default(), &|_: &str| {})
        .await
        .unwrap();

    match dashboard.state() {
        ViewState::Ready(response) => {
            assert!(response.text.starts_with("### Failed to Scan"));
            assert!(response.text.contains("API key not valid"));
        }
        other => panic!("unexpected state: {:?}", other),
    }
    assert_eq!(
        calls.lock().unwrap()[0].api_key.as_deref(),
        Some("AIza-user")
    );
}

#[tokio::test]
async fn test_page_and_static_report() {
    let static_dir = TempDir::new().unwrap();
    let report = ScoutReport {
        logic_breakdown: "Overnight audit".to_string(),
        ..Default::default()
    };
    let data_dir = static_dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(
        data_dir.join("latest_report.json"),
        serde_json::to_string_pretty(&report).unwrap(),
    )
    .unwrap();

    let base = spawn_scout(config_for("http://127.0.0.1:1/v1beta", "", &static_dir)).await;
    let http = reqwest::Client::new();

    let page = http.get(&base).send().await.unwrap().text().await.unwrap();
    assert!(page.contains("Overnight audit"));

    let asset: ScoutReport = http
        .get(format!("{}/data/latest_report.json", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(asset, report);

    let health = http
        .get(format!("{}/healthz", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(health, "ok");
}
