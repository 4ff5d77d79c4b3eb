//! Comparison report.
//!
//! The ranking rules live here as pure functions; `html` turns them into the
//! static page. Every count and threshold comes from `ReportConfig`.

pub mod html;

pub use html::HtmlReport;

use crate::config::ReportConfig;
use crate::types::{KeywordMap, MergedAnalysis};

/// One table row: the n-th entry of each column, if the column is that long.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRow<'a> {
    pub provider_b_label: Option<(&'a str, f32)>,
    pub provider_a_label: Option<(&'a str, f32)>,
    pub provider_a_logo: Option<(&'a str, f32)>,
}

/// The first `n` entries of a keyword map, in provider order.
pub fn top_rows(map: &KeywordMap, n: usize) -> Vec<(&str, f32)> {
    map.iter().take(n).collect()
}

/// Build exactly `config.table_rows` rows in provider ranking order.
pub fn table_rows<'a>(analysis: &'a MergedAnalysis, config: &ReportConfig) -> Vec<TableRow<'a>> {
    let n = config.table_rows;
    let b_labels = top_rows(&analysis.provider_b.labels, n);
    let a_labels = top_rows(&analysis.provider_a.labels, n);
    let a_logos = top_rows(&analysis.provider_a.logos, n);

    (0..n)
        .map(|i| TableRow {
            provider_b_label: b_labels.get(i).copied(),
            provider_a_label: a_labels.get(i).copied(),
            provider_a_logo: a_logos.get(i).copied(),
        })
        .collect()
}

/// The first `terms` label keys, each followed by a space.
pub fn search_string(labels: &KeywordMap, terms: usize) -> String {
    labels.keys().take(terms).map(|key| format!("{key} ")).collect()
}

/// The top logo, if its score is strictly above `threshold`.
pub fn inferred_brand(logos: &KeywordMap, threshold: f32) -> Option<&str> {
    logos
        .nth(0)
        .filter(|(_, score)| *score > threshold)
        .map(|(brand, _)| brand)
}

/// Provider A's search string: top labels plus the inferred brand, if any.
pub fn provider_a_search_string(analysis: &MergedAnalysis, config: &ReportConfig) -> String {
    let mut search = search_string(&analysis.provider_a.labels, config.search_terms);
    if let Some(brand) = inferred_brand(&analysis.provider_a.logos, config.brand_confidence) {
        search.push_str(brand);
    }
    search
}

/// Provider B's search string: top labels only.
pub fn provider_b_search_string(analysis: &MergedAnalysis, config: &ReportConfig) -> String {
    search_string(&analysis.provider_b.labels, config.search_terms)
}

/// Shortest decimal text of a score, cut to `chars` characters.
pub fn score_text(score: f32, chars: usize) -> String {
    score.to_string().chars().take(chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderResult;

    fn analysis(
        labels_a: KeywordMap,
        logos_a: KeywordMap,
        labels_b: KeywordMap,
    ) -> MergedAnalysis {
        MergedAnalysis::merge(
            "./img/item.jpg",
            ProviderResult::new(labels_a, logos_a),
            ProviderResult::labels_only(labels_b),
        )
    }

    fn numbered(n: usize, scale: f32) -> KeywordMap {
        (0..n)
            .map(|i| (format!("L{i:02}"), scale - i as f32))
            .collect()
    }

    #[test]
    fn test_search_string_takes_top_four() {
        let labels: KeywordMap = [
            ("Shovel", 0.95),
            ("Tool", 0.8),
            ("Garden", 0.7),
            ("Metal", 0.6),
            ("Handle", 0.5),
        ]
        .into_iter()
        .collect();
        assert_eq!(search_string(&labels, 4), "Shovel Tool Garden Metal ");
    }

    #[test]
    fn test_search_string_short_and_empty() {
        let labels: KeywordMap = [("Shovel", 0.95), ("Tool", 0.8)].into_iter().collect();
        assert_eq!(search_string(&labels, 4), "Shovel Tool ");
        assert_eq!(search_string(&KeywordMap::new(), 4), "");
    }

    #[test]
    fn test_brand_inferred_above_threshold() {
        let merged = analysis(
            [("Shoe", 0.9)].into_iter().collect(),
            [("Nike", 0.9)].into_iter().collect(),
            KeywordMap::new(),
        );
        let config = ReportConfig::default();
        let search = provider_a_search_string(&merged, &config);
        assert!(search.contains("Nike"));
        assert_eq!(search, "Shoe Nike");
    }

    #[test]
    fn test_brand_not_inferred_below_threshold() {
        let merged = analysis(
            [("Shoe", 0.9)].into_iter().collect(),
            [("Nike", 0.5)].into_iter().collect(),
            KeywordMap::new(),
        );
        let search = provider_a_search_string(&merged, &ReportConfig::default());
        assert!(!search.contains("Nike"));
    }

    #[test]
    fn test_brand_threshold_is_strict() {
        let logos: KeywordMap = [("Acme", 0.75)].into_iter().collect();
        assert_eq!(inferred_brand(&logos, 0.75), None);
        // Only the top logo is considered
        let logos: KeywordMap = [("Weak", 0.5), ("Strong", 0.99)].into_iter().collect();
        assert_eq!(inferred_brand(&logos, 0.75), None);
    }

    #[test]
    fn test_table_truncates_to_ten_rows_in_order() {
        let merged = analysis(numbered(3, 1.0), KeywordMap::new(), numbered(15, 99.0));
        let rows = table_rows(&merged, &ReportConfig::default());

        assert_eq!(rows.len(), 10);
        let b_labels: Vec<_> = rows
            .iter()
            .filter_map(|r| r.provider_b_label.map(|(k, _)| k.to_string()))
            .collect();
        let expected: Vec<_> = (0..10).map(|i| format!("L{i:02}")).collect();
        assert_eq!(b_labels, expected);

        // Shorter columns leave blank cells
        assert!(rows[2].provider_a_label.is_some());
        assert!(rows[3].provider_a_label.is_none());
        assert!(rows[0].provider_a_logo.is_none());
    }

    #[test]
    fn test_top_rows_keeps_order() {
        let labels = numbered(15, 99.0);
        let top = top_rows(&labels, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0], ("L00", 99.0));
        assert_eq!(top[9].0, "L09");
        assert_eq!(top_rows(&KeywordMap::new(), 10), Vec::new());
    }

    #[test]
    fn test_score_text_truncation() {
        assert_eq!(score_text(0.95, 6), "0.95");
        assert_eq!(score_text(92.1, 6), "92.1");
        assert_eq!(score_text(0.954_321_2, 6), "0.9543");
        assert_eq!(score_text(99.123_45, 6), "99.123");
    }
}
