#[cfg(test)]
mod tests {
    use crate::seed::{FALLBACK_LIMIT, fallback, fallback_response, seeded_products, seeded_signals};
    use crate::types::{ScoutReport, SearchParams};
    use std::collections::HashSet;

    #[test]
    fn test_fallback_shape() {
        let params = SearchParams::new(15, 40);
        let report = fallback(&params);

        assert!(report.top_5.len() <= FALLBACK_LIMIT);
        assert!(report.top_5.len() <= seeded_products().len());
        assert!(report.watchlist.is_empty());
        assert!(report.logic_breakdown.contains("last 15 days"));
    }

    #[test]
    fn test_fallback_is_a_permutation_of_seeds() {
        let report = fallback(&SearchParams::default());

        let seeded: HashSet<String> = seeded_products()
            .into_iter()
            .map(|p| p.product_name)
            .collect();
        let returned: HashSet<String> = report
            .top_5
            .iter()
            .map(|p| p.product_name.clone())
            .collect();

        assert_eq!(returned.len(), report.top_5.len());
        assert!(returned.is_subset(&seeded));
    }

    #[test]
    fn test_fallback_ignores_price_ceiling() {
        // 兜底数据不做价格过滤
        let report = fallback(&SearchParams::new(7, 1));
        assert_eq!(report.top_5.len(), seeded_products().len().min(FALLBACK_LIMIT));
    }

    #[test]
    fn test_fallback_response_parses_back() {
        let response = fallback_response(&SearchParams::new(30, 50)).unwrap();
        assert!(response.grounding.is_none());

        let report: ScoutReport = serde_json::from_str(&response.text).unwrap();
        assert!(report.logic_breakdown.contains("30 days"));
    }

    #[test]
    fn test_seeded_signals() {
        let signals = seeded_signals();
        assert_eq!(signals.len(), 5);
        assert!(signals.iter().all(|s| s.price_usd > 0.0));
    }
}
