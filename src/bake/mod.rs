//! 离线报告生成 - 对种子候选做印度市场核查，结果写入静态目录供页面加载

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::config::Config;
use crate::llm::{GeminiClient, GenerationRequest, ReportProvider};
use crate::seed::{self, SeedSignal};
use crate::types::ScoutReport;
use crate::ui::parse_report;

const AUDIT_SYSTEM_INSTRUCTION: &str = "You are an India Marketplace Audit Agent. \
Your job is to verify if specific products are available on Amazon.in, Myntra, or Flipkart. \
Use your vast knowledge of global and Indian markets. \
Be extremely strict. If a similar but different brand exists, it might still be a gap.";

/// 离线生成的结果
#[derive(Debug)]
pub struct BakeOutcome {
    pub report: ScoutReport,
    pub written: Vec<PathBuf>,
}

/// 使用配置中的Gemini凭据生成报告
pub async fn run<F>(config: &Config, on_progress: F) -> Result<BakeOutcome>
where
    F: Fn(&str) + Send + Sync,
{
    if !config.llm.has_credential() {
        bail!("GEMINI_API_KEY not found; the report baker needs a server credential");
    }
    let client = GeminiClient::new(&config.llm).context("Failed to create Gemini client")?;
    run_with(Arc::new(client), config, on_progress).await
}

/// 使用给定的模型服务生成报告
pub async fn run_with<F>(
    provider: Arc<dyn ReportProvider>,
    config: &Config,
    on_progress: F,
) -> Result<BakeOutcome>
where
    F: Fn(&str) + Send + Sync,
{
    let started_at = chrono::Local::now();
    tracing::info!("🧁 开始生成离线报告: {}", started_at.format("%Y-%m-%d %H:%M:%S"));

    on_progress("Scouting global markets for fresh viral signals...");
    let signals = seed::seeded_signals();

    let pause = config.bake.quota_pause_seconds;
    if pause > 0 {
        on_progress(&format!("Waiting {}s to respect API quota...", pause));
        tokio::time::sleep(Duration::from_secs(pause)).await;
    }

    on_progress("Verifying India availability for candidates...");
    let request = audit_request(&config.bake.model, &signals)?;
    let response = provider
        .generate(&request)
        .await
        .context("India availability verification failed")?;

    let report = match parse_report(&response.text) {
        Some(report) => report,
        None => bail!(
            "Failed to parse final report. Raw response:\n{}",
            response.text
        ),
    };

    let content =
        serde_json::to_string_pretty(&report).context("Failed to serialize final report")?;
    let outputs = config.bake_outputs();
    for path in &outputs {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create directory: {:?}", parent))?;
        }
        tokio::fs::write(path, &content)
            .await
            .context(format!("Failed to write report: {:?}", path))?;
        tracing::info!("💾 报告已写入 {}", path.display());
    }

    let elapsed = chrono::Local::now() - started_at;
    tracing::info!(
        products = report.top_5.len(),
        "🎉 离线报告生成完成，耗时 {}s",
        elapsed.num_seconds()
    );

    Ok(BakeOutcome {
        report,
        written: outputs,
    })
}

/// 核查请求不启用搜索工具，完全依赖模型自身的市场知识
pub fn audit_request(model: &str, signals: &[SeedSignal]) -> Result<GenerationRequest> {
    let candidates =
        serde_json::to_string(signals).context("Failed to serialize seeded signals")?;

    let prompt = format!(
        r#"For each product in this list: {candidates}
1. Search Amazon.in, Myntra, and Flipkart for the EXACT product or exact brand.
2. Determine if it is 'Truly Missing' or 'Available'.
3. Rank the top 5 'Truly Missing' items by virality potential.
4. Provide a rationale for why they will go viral in India.
Return the final report as a JSON object matching this schema:
{schema}"#,
        schema = ScoutReport::json_schema(),
    );

    Ok(GenerationRequest {
        model: model.to_string(),
        system_instruction: AUDIT_SYSTEM_INSTRUCTION.to_string(),
        prompt,
        enable_search: false,
        thinking_budget: None,
        temperature: None,
    })
}
