//! 日志初始化

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "viral_scout=info,tower_http=info";
const VERBOSE_FILTER: &str = "viral_scout=debug,tower_http=debug";

/// 初始化全局日志，`RUST_LOG` 优先于默认过滤规则
pub fn init(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // 重复初始化（例如测试中）时忽略
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
