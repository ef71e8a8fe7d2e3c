use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "viral-scout.toml";

/// 预生成报告相对于静态目录的路径
pub const LATEST_REPORT_PATH: &str = "data/latest_report.json";

/// 提示词配置档，决定默认模型、系统提示词与推理参数
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptProfile {
    /// 完整的四项审计过滤提示词，带思考预算与低温度
    #[serde(rename = "analyst")]
    #[default]
    Analyst,
    /// 精简提示词，配额更友好的轻量模型
    #[serde(rename = "lite")]
    Lite,
}

impl PromptProfile {
    pub fn default_model(&self) -> &'static str {
        match self {
            PromptProfile::Analyst => "gemini-3-pro-preview",
            PromptProfile::Lite => "gemini-1.5-flash",
        }
    }

    pub fn default_thinking_budget(&self) -> Option<u32> {
        match self {
            PromptProfile::Analyst => Some(15000),
            PromptProfile::Lite => None,
        }
    }

    pub fn default_temperature(&self) -> Option<f64> {
        match self {
            PromptProfile::Analyst => Some(0.2),
            PromptProfile::Lite => None,
        }
    }
}

impl std::fmt::Display for PromptProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptProfile::Analyst => write!(f, "analyst"),
            PromptProfile::Lite => write!(f, "lite"),
        }
    }
}

impl std::str::FromStr for PromptProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "analyst" | "pro" => Ok(PromptProfile::Analyst),
            "lite" | "flash" => Ok(PromptProfile::Lite),
            _ => Err(format!("Unknown prompt profile: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// HTTP服务配置
    pub server: ServerConfig,

    /// 模型服务配置
    pub llm: LLMConfig,

    /// 离线报告生成配置
    pub bake: BakeConfig,

    /// 终端直连模式下使用的客户端API Key
    #[serde(skip_serializing)]
    pub client_api_key: String,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// HTTP服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind: String,

    /// 静态资源目录，`data/latest_report.json` 位于其下
    pub static_dir: PathBuf,
}

/// 模型服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// 服务端持有的API KEY，为空时走兜底数据
    #[serde(skip_serializing)]
    pub api_key: String,

    /// API基地址
    pub api_base_url: String,

    /// 提示词配置档
    pub profile: PromptProfile,

    /// 覆盖配置档的默认模型
    pub model: Option<String>,

    /// 覆盖配置档的思考预算
    pub thinking_budget: Option<u32>,

    /// 覆盖配置档的温度
    pub temperature: Option<f64>,

    /// 是否启用Google搜索增强
    pub enable_search: bool,

    /// 请求超时时间（秒），不设置时依赖服务端的超时
    pub timeout_seconds: Option<u64>,
}

/// 离线报告生成配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct BakeConfig {
    /// 核查阶段使用的模型
    pub model: String,

    /// 调用核查前的等待时间（秒），避开免费额度的速率限制
    pub quota_pause_seconds: u64,

    /// 额外的输出路径
    pub extra_outputs: Vec<PathBuf>,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 加载配置：显式路径优先，其次当前目录下的默认配置文件，最后使用默认值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_config_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE);

        if default_config_path.exists() {
            Self::from_file(&default_config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// 预生成报告的位置
    pub fn latest_report_path(&self) -> PathBuf {
        self.server.static_dir.join(LATEST_REPORT_PATH)
    }

    /// 离线报告的全部输出路径
    pub fn bake_outputs(&self) -> Vec<PathBuf> {
        let mut outputs = vec![self.latest_report_path()];
        outputs.extend(self.bake.extra_outputs.iter().cloned());
        outputs
    }
}

impl LLMConfig {
    /// 实际使用的模型
    pub fn effective_model(&self) -> String {
        match self.model.as_deref() {
            Some(model) if !model.trim().is_empty() => model.to_string(),
            _ => self.profile.default_model().to_string(),
        }
    }

    pub fn effective_thinking_budget(&self) -> Option<u32> {
        self.thinking_budget
            .or_else(|| self.profile.default_thinking_budget())
    }

    pub fn effective_temperature(&self) -> Option<f64> {
        self.temperature
            .or_else(|| self.profile.default_temperature())
    }

    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// 读取服务端凭据，`GEMINI_API_KEY` 优先，其次 `API_KEY`
pub fn credential_from_env() -> String {
    ["GEMINI_API_KEY", "API_KEY"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_default()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LLMConfig::default(),
            bake: BakeConfig::default(),
            client_api_key: std::env::var("VIRAL_SCOUT_API_KEY").unwrap_or_default(),
            verbose: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: String::from("127.0.0.1:3000"),
            static_dir: PathBuf::from("public"),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: credential_from_env(),
            api_base_url: String::from("https://generativelanguage.googleapis.com/v1beta"),
            profile: PromptProfile::default(),
            model: None,
            thinking_budget: None,
            temperature: None,
            enable_search: true,
            timeout_seconds: None,
        }
    }
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            model: String::from("gemini-2.0-flash-lite"),
            quota_pause_seconds: 30,
            extra_outputs: vec![],
        }
    }
}
