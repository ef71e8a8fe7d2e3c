//! 终端文本渲染

use crate::types::{GroundingMetadata, ProviderResponse};

use super::ViewState;
use super::parse::parse_report;

/// 渲染当前状态
pub fn render_state(state: &ViewState) -> String {
    match state {
        ViewState::Idle => "Niche Scout Active. Start scouting to find cross-market viral products.\n".to_string(),
        ViewState::Loading { status } => format!("⏳ Analyzing Virality & Gaps: {}\n", status),
        ViewState::Ready(response) => render_report(response),
    }
}

/// 能解析为报告时输出排行榜，否则原样输出文本
pub fn render_report(response: &ProviderResponse) -> String {
    let mut out = String::new();

    match parse_report(&response.text) {
        Some(report) => {
            out.push_str("🚀 Next-gen viral products identified for first-mover advantage.\n\n");
            if !report.logic_breakdown.trim().is_empty() {
                out.push_str(&format!("Scout Logic: {}\n\n", report.logic_breakdown));
            }

            if !report.top_5.is_empty() {
                out.push_str("== Top 5 Viral Gap Products ==\n");
                for (rank, item) in report.top_5.iter().enumerate() {
                    out.push_str(&format!(
                        "{}. {} ({}) - ${} | virality {}%\n",
                        rank + 1,
                        item.product_name,
                        item.brand,
                        item.price_usd,
                        item.virality_score
                    ));
                    out.push_str(&format!("   {} / {}\n", item.category, item.niche));
                    if !item.markets.is_empty() {
                        out.push_str(&format!("   markets: {}\n", item.markets.join(", ")));
                    }
                    if !item.virality_rationale.is_empty() {
                        out.push_str(&format!("   why: {}\n", item.virality_rationale));
                    }
                    if !item.india_check_summary.is_empty() {
                        out.push_str(&format!("   india: {}\n", item.india_check_summary));
                    }
                    if !item.buy_link.is_empty() {
                        out.push_str(&format!("   shop: {}\n", item.buy_link));
                    }
                    for post in &item.evidence_posts {
                        out.push_str(&format!("   post: {}\n", post));
                    }
                }
                out.push('\n');
            }

            if !report.watchlist.is_empty() {
                out.push_str("== Signals to Watch ==\n");
                for entry in &report.watchlist {
                    out.push_str(&format!(
                        "- {} ({}): {}\n",
                        entry.product_name, entry.brand, entry.reason
                    ));
                }
                out.push('\n');
            }
        }
        None => {
            out.push_str(&response.text);
            if !response.text.ends_with('\n') {
                out.push('\n');
            }
        }
    }

    out.push_str(&render_citations(response.grounding.as_ref()));
    out
}

pub fn render_citations(grounding: Option<&GroundingMetadata>) -> String {
    let Some(grounding) = grounding else {
        return String::new();
    };

    let lines: Vec<String> = grounding
        .web_sources()
        .map(|web| format!("- {} <{}>", web.display_title(), web.uri))
        .collect();
    if lines.is_empty() {
        return String::new();
    }

    format!("\n== Discovery Sources ==\n{}\n", lines.join("\n"))
}
