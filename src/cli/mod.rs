use crate::config::{Config, PromptProfile};
use crate::types::SearchParams;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Viral Scout - 寻找海外爆红但尚未进入印度市场的商品
#[derive(Parser, Debug)]
#[command(name = "viral-scout")]
#[command(
    about = "Market-gap scouting service. Asks a search-grounded LLM for products going viral in the UK, USA, Brazil and South Korea that are still missing from Indian marketplaces."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 提示词配置档 (analyst, lite)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// 覆盖配置档的默认模型
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Gemini API基地址
    #[arg(long, global = true)]
    pub llm_api_base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// 启动HTTP服务与页面
    Serve {
        /// 监听地址
        #[arg(long)]
        bind: Option<String>,

        /// 静态资源目录（预生成报告位于其 data/ 子目录）
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// 在终端中执行一次调研
    Scout {
        /// 时间窗口（天）
        #[arg(long, default_value_t = 7, value_parser = parse_window)]
        days: u32,

        /// 价格上限（美元）
        #[arg(long, default_value_t = 50)]
        max_price: u32,

        /// 使用自己的API Key直连模型
        #[arg(long)]
        api_key: Option<String>,

        /// 请求远端服务的 /api/scout 接口
        #[arg(long)]
        endpoint: Option<String>,

        /// 直接输出模型原始JSON
        #[arg(long)]
        json: bool,
    },

    /// 离线生成 latest_report.json
    Bake {
        /// 跳过调用前的配额等待
        #[arg(long)]
        no_pause: bool,

        /// 额外的输出路径，可重复
        #[arg(short, long)]
        output: Vec<PathBuf>,

        /// 静态资源目录
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

fn parse_window(s: &str) -> Result<u32, String> {
    let days: u32 = s.parse().map_err(|_| format!("`{}` is not a number", s))?;
    if SearchParams::WINDOW_OPTIONS.contains(&days) {
        Ok(days)
    } else {
        Err(format!(
            "time window must be one of {:?}",
            SearchParams::WINDOW_OPTIONS
        ))
    }
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config =
            Config::load(self.config.as_deref()).context("Failed to load configuration")?;

        // 覆盖LLM配置
        if let Some(profile_str) = self.profile {
            match profile_str.parse::<PromptProfile>() {
                Ok(profile) => config.llm.profile = profile,
                Err(_) => eprintln!(
                    "⚠️ 警告: 未知的配置档: {}，使用 {}",
                    profile_str, config.llm.profile
                ),
            }
        }
        if let Some(model) = self.model {
            config.llm.model = Some(model);
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }

        match self.command {
            Command::Serve { bind, static_dir } => {
                if let Some(bind) = bind {
                    config.server.bind = bind;
                }
                if let Some(static_dir) = static_dir {
                    config.server.static_dir = static_dir;
                }
            }
            Command::Scout { api_key, .. } => {
                if let Some(api_key) = api_key {
                    config.client_api_key = api_key;
                }
            }
            Command::Bake {
                no_pause,
                output,
                static_dir,
            } => {
                if no_pause {
                    config.bake.quota_pause_seconds = 0;
                }
                config.bake.extra_outputs.extend(output);
                if let Some(static_dir) = static_dir {
                    config.server.static_dir = static_dir;
                }
            }
        }

        config.verbose = config.verbose || self.verbose;
        Ok(config)
    }
}
