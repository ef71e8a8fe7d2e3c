//! 种子数据 - 模型服务不可用时的兜底报告

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::ScoutError;
use crate::types::{ProviderResponse, ScoutProduct, ScoutReport, SearchParams};

/// 兜底报告最多包含的商品数
pub const FALLBACK_LIMIT: usize = 5;

/// 未经核查的原始候选信号，供离线报告生成使用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedSignal {
    pub product_name: String,
    pub brand: String,
    pub category: String,
    pub niche: String,
    pub markets: Vec<String>,
    pub price_usd: f64,
}

#[allow(clippy::too_many_arguments)]
fn product(
    product_name: &str,
    brand: &str,
    category: &str,
    niche: &str,
    markets: &[&str],
    price_usd: f64,
    buy_link: &str,
    virality_score: i64,
    virality_rationale: &str,
    india_check_summary: &str,
) -> ScoutProduct {
    ScoutProduct {
        product_name: product_name.to_string(),
        brand: brand.to_string(),
        category: category.to_string(),
        niche: niche.to_string(),
        markets: markets.iter().map(|m| m.to_string()).collect(),
        price_usd,
        buy_link: buy_link.to_string(),
        evidence_posts: vec![],
        virality_score,
        virality_rationale: virality_rationale.to_string(),
        india_check_summary: india_check_summary.to_string(),
    }
}

/// 固定的示例商品列表
pub fn seeded_products() -> Vec<ScoutProduct> {
    vec![
        product(
            "Seattle Ultrasonics C-200 Knife",
            "Seattle Ultrasonics",
            "Home/Kitchen",
            "Home Cooks & Food Enthusiasts",
            &["USA", "UK"],
            45.0,
            "https://seattleultrasonics.com",
            96,
            "High 'wow' factor in videos due to vibrating blade cutting through tricky foods with 50% less effort.",
            "GAP VERIFIED. No ultrasonic chef knives on Amazon.in.",
        ),
        product(
            "POVEC C1 Sunglasses",
            "POVEC",
            "Tech/Fashion",
            "Tech Early Adopters",
            &["South Korea", "USA"],
            49.0,
            "https://povec.com",
            92,
            "Manual tint control is a futuristic feature that creates high engagement on social reels.",
            "GAP VERIFIED. Only passive lenses exist in India.",
        ),
        product(
            "HydroStream Portable Bidet",
            "HydroStream",
            "Travel/Personal Care",
            "Digital Nomads & Frequent Travelers",
            &["UK", "Europe"],
            35.0,
            "https://hydrostream.co.uk",
            88,
            "Compact, sleek design solves hygiene issues for travelers in a unique, TikTok-friendly way.",
            "GAP VERIFIED. Bulky alternatives exist, but this sleek portable form factor is missing.",
        ),
        product(
            "MagLink 3-in-1 Charging Slate",
            "MagLink",
            "Tech",
            "Apple Enthusiasts / Organization Pros",
            &["USA", "Canada"],
            42.0,
            "https://maglink.tech",
            94,
            "Magnetic folding mechanism is incredibly satisfying to watch in reels.",
            "GAP VERIFIED. Generic stands exist, but this specific 'slate' folding design hasn't hit major Indian portals.",
        ),
    ]
}

fn signal(
    product_name: &str,
    brand: &str,
    category: &str,
    niche: &str,
    markets: &[&str],
    price_usd: f64,
) -> SeedSignal {
    SeedSignal {
        product_name: product_name.to_string(),
        brand: brand.to_string(),
        category: category.to_string(),
        niche: niche.to_string(),
        markets: markets.iter().map(|m| m.to_string()).collect(),
        price_usd,
    }
}

/// 离线报告使用的候选信号
pub fn seeded_signals() -> Vec<SeedSignal> {
    vec![
        signal(
            "Seattle Ultrasonics C-200 Knife",
            "Seattle Ultrasonics",
            "Home/Kitchen",
            "Home Cooks & Food Enthusiasts",
            &["USA", "UK"],
            45.0,
        ),
        signal(
            "POVEC C1 Sunglasses",
            "POVEC",
            "Tech/Fashion",
            "Tech Early Adopters",
            &["South Korea", "USA"],
            49.0,
        ),
        signal(
            "Pro-Translate Pen 140",
            "Generic/OEM",
            "Tech/Education",
            "Travelers & Students",
            &["Global", "UK"],
            38.0,
        ),
        signal(
            "3-in-1 Retractable Car Hub",
            "Generic/Viral",
            "Auto Tech",
            "Commuters",
            &["South Korea", "Global"],
            22.0,
        ),
        signal(
            "LED Flashlight Repair Gloves",
            "Generic",
            "Tools/DIY",
            "DIYers & Night Cyclists",
            &["USA", "UK"],
            15.0,
        ),
    ]
}

/// 生成兜底报告：打乱种子商品顺序，最多取 `FALLBACK_LIMIT` 个
pub fn fallback(params: &SearchParams) -> ScoutReport {
    let mut top_5 = seeded_products();
    top_5.shuffle(&mut rand::rng());
    top_5.truncate(FALLBACK_LIMIT);

    ScoutReport {
        top_5,
        watchlist: vec![],
        logic_breakdown: format!(
            "Scouted for high-utility viral signals across global markets in the last {} days. Focused on Visual Wow Factor and Indian Market Gaps.",
            params.time_window_days
        ),
    }
}

/// 以模型响应的形状返回兜底报告，`grounding` 为空
pub fn fallback_response(params: &SearchParams) -> Result<ProviderResponse, ScoutError> {
    ProviderResponse::from_report(&fallback(params))
}

#[cfg(test)]
mod tests;
