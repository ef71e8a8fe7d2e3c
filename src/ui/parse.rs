//! 从模型文本中解析报告

use regex::Regex;
use std::sync::LazyLock;

use crate::types::ScoutReport;

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*?\})\s*```").unwrap());

/// 严格解码为 `ScoutReport`
///
/// 依次尝试：整段文本、```json 代码块、最外层的 `{...}` 子串。
/// 任何一步解码失败都只记录调试日志，全部失败时返回 `None`，由展示层降级为原文。
pub fn parse_report(text: &str) -> Option<ScoutReport> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut candidates: Vec<&str> = vec![trimmed];
    if let Some(captures) = FENCED_JSON.captures(trimmed)
        && let Some(block) = captures.get(1)
    {
        candidates.push(block.as_str());
    }
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && start < end
    {
        candidates.push(&trimmed[start..=end]);
    }

    let mut last_error = None;
    for candidate in candidates {
        match serde_json::from_str::<ScoutReport>(candidate) {
            Ok(report) => return Some(report),
            Err(e) => last_error = Some(e),
        }
    }

    if let Some(e) = last_error {
        tracing::debug!("Parse error, falling back to raw text: {}", e);
    }
    None
}
