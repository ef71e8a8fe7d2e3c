use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::grounding::GroundingMetadata;
use crate::error::ScoutError;

/// 单次调研请求的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// 信号时间窗口（天）
    pub time_window_days: u32,
    /// 价格上限（美元）
    pub max_price_usd: u32,
}

impl SearchParams {
    /// 页面提供的时间窗口选项
    pub const WINDOW_OPTIONS: [u32; 3] = [7, 15, 30];

    pub fn new(time_window_days: u32, max_price_usd: u32) -> Self {
        Self {
            time_window_days,
            max_price_usd,
        }
    }

    /// 两个参数都必须为正整数
    pub fn validate(&self) -> Result<(), ScoutError> {
        if self.time_window_days == 0 {
            return Err(ScoutError::InvalidParams(
                "time_window_days must be greater than 0".to_string(),
            ));
        }
        if self.max_price_usd == 0 {
            return Err(ScoutError::InvalidParams(
                "max_price_usd must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::new(7, 50)
    }
}

/// 候选爆款商品，字段全部由模型（或种子数据）提供，系统只做转发
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoutProduct {
    pub product_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
    /// 品类，例如 Travel、Home、Tech
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// 具体的创作者细分人群，例如 Solo Travelers
    #[serde(default, deserialize_with = "null_as_default")]
    pub niche: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub markets: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price_usd: f64,
    /// 商品详情页直链
    #[serde(default, deserialize_with = "null_as_default")]
    pub buy_link: String,
    /// 社交平台上的佐证帖子链接
    #[serde(default, deserialize_with = "null_as_default")]
    pub evidence_posts: Vec<String>,
    /// 病毒传播潜力评分 (1-100)，不做范围校验
    #[serde(default, deserialize_with = "lenient_score")]
    pub virality_score: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub virality_rationale: String,
    /// 印度市场缺口核查记录
    #[serde(default, deserialize_with = "null_as_default")]
    pub india_check_summary: String,
}

/// 观察名单条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WatchlistEntry {
    pub product_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

/// 调研报告
///
/// `top_5` 保持模型给出的顺序，不按 `virality_score` 重新排序。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScoutReport {
    pub top_5: Vec<ScoutProduct>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub watchlist: Vec<WatchlistEntry>,
    /// 搜索过程与病毒性评估说明
    #[serde(default, deserialize_with = "null_as_default")]
    pub logic_breakdown: String,
}

impl ScoutReport {
    /// 报告的JSON Schema，嵌入到系统提示词中
    pub fn json_schema() -> String {
        let schema = schemars::schema_for!(ScoutReport);
        serde_json::to_string_pretty(&schema).unwrap_or_default()
    }
}

/// 模型原始输出：文本（期望内嵌报告JSON，但不保证）加上可选的引用信息
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProviderResponse {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub grounding: Option<GroundingMetadata>,
}

impl ProviderResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            grounding: None,
        }
    }

    /// 将一份完整报告包装成与模型输出相同的形状
    pub fn from_report(report: &ScoutReport) -> Result<Self, ScoutError> {
        Ok(Self::from_text(serde_json::to_string(report)?))
    }
}

/// 模型偶尔会把缺失字段写成 `null`，按缺省值处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 评分接受整数、小数（四舍五入）与 `"92%"` 这样的字符串
fn lenient_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Score {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Option::<Score>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Score::Int(score)) => Ok(score),
        Some(Score::Float(score)) => Ok(score.round() as i64),
        Some(Score::Text(text)) => text
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map(|score| score.round() as i64)
            .map_err(serde::de::Error::custom),
    }
}
