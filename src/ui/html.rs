//! 浏览器页面渲染（服务端生成HTML）

use crate::types::{
    GroundingMetadata, ProviderResponse, ScoutProduct, SearchParams, WatchlistEntry,
};

use super::parse::parse_report;
use super::{Dashboard, LOADING_STATUS, ViewState};

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #f8fafc; color: #0f172a; }
header { background: #fff; border-bottom: 1px solid #e2e8f0; padding: 16px 24px; }
header h1 { margin: 0; font-size: 18px; font-weight: 900; }
header p { margin: 4px 0 0; font-size: 10px; color: #94a3b8; text-transform: uppercase; letter-spacing: .1em; }
main { display: grid; grid-template-columns: 280px 1fr; gap: 48px; max-width: 1152px; margin: 0 auto; padding: 48px 24px; }
aside form { background: #fff; border: 1px solid #e2e8f0; border-radius: 32px; padding: 32px; }
label { display: block; font-size: 10px; font-weight: 900; text-transform: uppercase; margin: 24px 0 8px; }
input, select { width: 100%; box-sizing: border-box; padding: 12px 16px; border: 2px solid #f1f5f9; border-radius: 16px; background: #f8fafc; }
button { margin-top: 32px; width: 100%; padding: 18px; border: 0; border-radius: 24px; background: #4f46e5; color: #fff; font-weight: 900; text-transform: uppercase; }
button:disabled { background: #f1f5f9; color: #94a3b8; }
.notice { margin-top: 16px; color: #b91c1c; font-size: 12px; }
.placeholder, .loading { text-align: center; padding: 160px 24px; border: 2px dashed #e2e8f0; border-radius: 48px; background: #fff; }
.banner { background: #1e1b4b; color: #fff; border-radius: 40px; padding: 40px; margin-bottom: 32px; }
.banner h2 { font-size: 32px; margin: 0 0 24px; }
.logic { background: rgba(255,255,255,.05); border-radius: 24px; padding: 24px; font-size: 12px; color: #cbd5e1; }
table { width: 100%; border-collapse: collapse; background: #fff; border-radius: 24px; overflow: hidden; margin-bottom: 32px; font-size: 13px; }
th { text-align: left; font-size: 10px; text-transform: uppercase; color: #64748b; background: #f8fafc; padding: 12px 24px; }
td { padding: 16px 24px; border-top: 1px solid #f1f5f9; vertical-align: top; }
.score { font-weight: 900; color: #4f46e5; }
.watchlist { background: #fffbeb; border: 1px solid #fef3c7; border-radius: 24px; padding: 32px; margin-bottom: 32px; }
.watchlist .grid, .sources .grid { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
.card { background: #fff; border-radius: 16px; padding: 16px; border: 1px solid #e2e8f0; }
.sources { margin-top: 32px; padding-top: 24px; border-top: 1px solid #e2e8f0; }
.sources a { display: block; text-decoration: none; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.raw { background: #fff; border: 1px solid #e2e8f0; border-radius: 24px; padding: 32px; font-size: 14px; }
"#;

const LOADING_SCRIPT: &str = r#"
document.getElementById('scout-form').addEventListener('submit', function () {
  this.querySelector('button').disabled = true;
  this.querySelector('button').textContent = 'Agent Mapping...';
  document.getElementById('result').hidden = true;
  document.getElementById('loading').hidden = false;
});
"#;

/// 转义所有来自模型或用户的字符串
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// 只有 http(s) 链接可以放进 `href`，返回转义后的地址
pub fn safe_href(url: &str) -> Option<String> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        Some(escape_html(url))
    } else {
        None
    }
}

/// 渲染整页
pub fn render_page(dashboard: &Dashboard, notice: Option<&str>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Viral Scout</title>\n");
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));
    html.push_str(
        "<header><h1>VIRAL SCOUT</h1><p>Niche Product Arbitrage</p></header>\n<main>\n",
    );
    html.push_str(&render_form(dashboard.params(), dashboard.is_loading(), notice));

    html.push_str("<section>\n");
    html.push_str(&format!(
        "<div id=\"loading\" class=\"loading\" hidden>{}</div>\n",
        render_loading(LOADING_STATUS)
    ));
    html.push_str("<div id=\"result\">\n");
    match dashboard.state() {
        ViewState::Idle => html.push_str(&render_placeholder()),
        ViewState::Loading { status } => html.push_str(&format!(
            "<div class=\"loading\">{}</div>",
            render_loading(status)
        )),
        ViewState::Ready(response) => html.push_str(&render_report(response)),
    }
    html.push_str("\n</div>\n</section>\n</main>\n");
    html.push_str(&format!("<script>{}</script>\n</body>\n</html>\n", LOADING_SCRIPT));
    html
}

fn render_form(params: &SearchParams, loading: bool, notice: Option<&str>) -> String {
    let mut html = String::new();
    html.push_str("<aside>\n<form id=\"scout-form\" method=\"post\" action=\"/\">\n");
    html.push_str("<h2>Arbitrage Setup</h2>\n");
    html.push_str("<label for=\"api_key\">Gemini API Key</label>\n");
    html.push_str(
        "<input id=\"api_key\" name=\"api_key\" type=\"password\" placeholder=\"AIzaSy... (optional when the server holds a key)\">\n",
    );

    html.push_str("<label for=\"time_window_days\">Signal Window</label>\n");
    html.push_str("<select id=\"time_window_days\" name=\"time_window_days\">\n");
    for days in SearchParams::WINDOW_OPTIONS {
        let caption = match days {
            15 => "Last 15 Days (Better Variety)".to_string(),
            30 => "Last 30 Days (Full Market)".to_string(),
            _ => format!("Last {} Days", days),
        };
        let selected = if days == params.time_window_days {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            days, selected, caption
        ));
    }
    html.push_str("</select>\n");

    html.push_str("<label for=\"max_price_usd\">Budget Threshold ($)</label>\n");
    html.push_str(&format!(
        "<input id=\"max_price_usd\" name=\"max_price_usd\" type=\"number\" min=\"1\" value=\"{}\">\n",
        params.max_price_usd
    ));

    let disabled = if loading { " disabled" } else { "" };
    let caption = if loading {
        "Agent Mapping..."
    } else {
        "Scout Viral Gaps"
    };
    html.push_str(&format!(
        "<button type=\"submit\"{}>{}</button>\n",
        disabled, caption
    ));
    if let Some(notice) = notice {
        html.push_str(&format!(
            "<p class=\"notice\">{}</p>\n",
            escape_html(notice)
        ));
    }
    html.push_str("</form>\n</aside>\n");
    html
}

fn render_placeholder() -> String {
    "<div class=\"placeholder\"><h3>Niche Scout Active</h3><p>Start scouting to find cross-market viral products across Travel, Home, and Tech niches that haven't hit India yet.</p></div>".to_string()
}

fn render_loading(status: &str) -> String {
    format!(
        "<h3>Analyzing Virality &amp; Gaps</h3><p>{}</p>",
        escape_html(status)
    )
}

/// 渲染一次结果：能解析则为结构化面板，否则为原文
pub fn render_report(response: &ProviderResponse) -> String {
    let citations = render_citations(response.grounding.as_ref());

    let Some(report) = parse_report(&response.text) else {
        return format!(
            "<div class=\"raw\"><h2>Viral Audit</h2>{}{}</div>",
            markdown::to_html(&response.text),
            citations
        );
    };

    let logic = if report.logic_breakdown.trim().is_empty() {
        "Analyzing cross-platform velocity for high-utility, diverse product categories with zero Indian marketplace presence."
    } else {
        report.logic_breakdown.as_str()
    };

    let mut html = String::new();
    html.push_str("<div class=\"banner\">\n");
    html.push_str("<p>High Virality Alert &middot; India Gaps Found</p>\n");
    html.push_str("<h2>Next-gen viral products identified for first-mover advantage.</h2>\n");
    html.push_str(&format!(
        "<div class=\"logic\"><strong>Scout Logic</strong><p>{}</p></div>\n</div>\n",
        escape_html(logic)
    ));
    html.push_str(&render_product_table(&report.top_5));
    html.push_str(&render_watchlist(&report.watchlist));
    html.push_str(&citations);
    html
}

/// 商品表格，按模型给出的顺序展示
fn render_product_table(items: &[ScoutProduct]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut html = String::new();
    html.push_str("<table>\n<caption>Top 5 Viral Gap Products</caption>\n");
    html.push_str("<thead><tr><th>#</th><th>Category &amp; Niche</th><th>Product Details</th><th>Virality Score</th><th>India Status</th><th>Action</th></tr></thead>\n<tbody>\n");
    for (rank, item) in items.iter().enumerate() {
        html.push_str("<tr>");
        html.push_str(&format!("<td>{}</td>", rank + 1));
        html.push_str(&format!(
            "<td><strong>{}</strong><br><em>{}</em></td>",
            escape_html(&item.category),
            escape_html(&item.niche)
        ));
        html.push_str(&format!(
            "<td><strong>{}</strong><br>{} &mdash; ${}<br><small>{}</small></td>",
            escape_html(&item.product_name),
            escape_html(&item.brand),
            item.price_usd,
            escape_html(&item.markets.join(", "))
        ));
        html.push_str(&format!(
            "<td><span class=\"score\">{}%</span><br><small>{}</small></td>",
            item.virality_score,
            escape_html(&item.virality_rationale)
        ));
        html.push_str(&format!(
            "<td><strong>Gap Verified</strong><br>{}</td>",
            escape_html(&item.india_check_summary)
        ));
        html.push_str(&format!(
            "<td>{}{}</td>",
            render_shop_link(&item.buy_link),
            render_evidence(&item.evidence_posts)
        ));
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn render_shop_link(buy_link: &str) -> String {
    match safe_href(buy_link) {
        Some(href) => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Shop</a>",
            href
        ),
        None if buy_link.trim().is_empty() => String::new(),
        None => format!("<small>{}</small>", escape_html(buy_link)),
    }
}

fn render_evidence(posts: &[String]) -> String {
    posts
        .iter()
        .enumerate()
        .map(|(i, post)| match safe_href(post) {
            Some(href) => format!(
                "<br><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Post {}</a>",
                href,
                i + 1
            ),
            None => format!("<br><small>Post {}: {}</small>", i + 1, escape_html(post)),
        })
        .collect()
}

fn render_watchlist(entries: &[WatchlistEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut html = String::new();
    html.push_str("<div class=\"watchlist\">\n<h4>Signals to Watch</h4>\n<div class=\"grid\">\n");
    for entry in entries {
        html.push_str(&format!(
            "<div class=\"card\"><strong>{}</strong><br><small>{}</small><p><em>Status: {}</em></p></div>\n",
            escape_html(&entry.product_name),
            escape_html(&entry.brand),
            escape_html(&entry.reason)
        ));
    }
    html.push_str("</div>\n</div>\n");
    html
}

/// 引用来源；没有引用信息时不输出任何内容
pub fn render_citations(grounding: Option<&GroundingMetadata>) -> String {
    let Some(grounding) = grounding else {
        return String::new();
    };
    let links: Vec<String> = grounding
        .web_sources()
        .map(|web| {
            let title = escape_html(web.display_title());
            match safe_href(&web.uri) {
                Some(href) => format!(
                    "<a class=\"card\" href=\"{href}\" target=\"_blank\" rel=\"noopener noreferrer\"><strong>{title}</strong><br><small>{href}</small></a>"
                ),
                None => format!(
                    "<div class=\"card\"><strong>{}</strong><br><small>{}</small></div>",
                    title,
                    escape_html(&web.uri)
                ),
            }
        })
        .collect();

    if links.is_empty() {
        return String::new();
    }

    format!(
        "<div class=\"sources\"><h4>Discovery Sources</h4><div class=\"grid\">{}</div></div>",
        links.join("\n")
    )
}
