use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 模型声明使用过的网页来源
///
/// 未建模的字段（`searchEntryPoint`、`groundingSupports` 等）原样保留在 `extra` 中转发。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_search_queries: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
    /// 非网页来源，例如 `retrievedContext`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WebSource {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl GroundingMetadata {
    /// 仅返回包含网页信息的来源，保持原有顺序
    pub fn web_sources(&self) -> impl Iterator<Item = &WebSource> {
        self.grounding_chunks
            .iter()
            .filter_map(|chunk| chunk.web.as_ref())
    }
}

impl WebSource {
    /// 缺少标题时显示 "Source"
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => "Source",
        }
    }
}
