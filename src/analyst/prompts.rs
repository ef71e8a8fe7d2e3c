//! 调研提示词模板

use crate::config::PromptProfile;
use crate::types::{ScoutReport, SearchParams};

/// 单次调研的系统指令与用户提示词
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    pub system_instruction: String,
    pub prompt: String,
}

impl PromptTemplate {
    pub fn for_profile(profile: PromptProfile, params: &SearchParams) -> Self {
        match profile {
            PromptProfile::Analyst => Self::analyst(params),
            PromptProfile::Lite => Self::lite(params),
        }
    }

    /// 四项审计过滤：品类多样性、病毒性、印度缺口核查、链接准确性
    fn analyst(params: &SearchParams) -> Self {
        let system_instruction = format!(
            r#"You are a Social Commerce Trend Scout specializing in "Viral Arbitrage."
Your goal is to find high-novelty, problem-solving products (<= ${max_price}) that are exploding on TikTok/Instagram in the UK, USA, BR, or KR but are entirely missing from India.

CORE AUDIT FILTERS:
1. VARIETY OVER COSMETICS: Avoid oversaturated beauty products. Prioritize Travel Gear (e.g., hidden-pocket jackets), Home Tech, Kitchen Hacks, Productivity Tools, and Viral Fashion Gadgets.
2. VIRALITY POTENTIAL: Score products based on "The Scroll-Stop Factor." High virality = Unique utility, visual "wow" moment, or solving a common frustration in a new way.
3. INDIA GAP CHECK: Ensure the product is not on Amazon.in, Myntra, or Flipkart. We want first-mover advantage.
4. LINK ACCURACY: Provide the actual product page URL. Use the Thinking Budget to verify.

Return at most 5 products in "top_5", a "watchlist" of near misses, and a "logic_breakdown" explaining the search and the virality assessment.

JSON SCHEMA (MANDATORY):
{schema}"#,
            max_price = params.max_price_usd,
            schema = ScoutReport::json_schema(),
        );

        let prompt = format!(
            r#"Search for diverse viral products (NOT just cosmetics) trending in UK, USA, BR, and KR in the last {days} days.
Look for high-novelty items (Travel hacks, Tech gadgets, Home solutions) priced under ${max_price}.
Evaluate their "Virality Potential" for the Indian market and verify they are NOT sold in India."#,
            days = params.time_window_days,
            max_price = params.max_price_usd,
        );

        Self {
            system_instruction,
            prompt,
        }
    }

    fn lite(params: &SearchParams) -> Self {
        Self {
            system_instruction: "You are a Social Commerce Trend Scout. You MUST use the googleSearch tool to find REAL products trending NOW. Return STRICTLY JSON.".to_string(),
            prompt: format!(
                "Perform a LIVE search for viral products trending in UK, USA, BR, and KR in the last {} days, priced under ${}. Find 10 candidates. Return a JSON report with top_5 gap products and a watchlist. Ensure the response is a valid JSON object.",
                params.time_window_days, params.max_price_usd
            ),
        }
    }
}
