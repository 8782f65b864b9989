/// Category label used when no keyword rule matches.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Ordered keyword rules mapping a channel name to a coarse category.
///
/// Rows are evaluated in declaration order and, within a row, keywords in
/// declaration order; the first row with any case-insensitive substring match
/// wins. Unmatched names fall through to [`FALLBACK_CATEGORY`].
#[derive(Debug, Clone)]
pub struct CategoryRules {
    rules: Vec<(String, Vec<String>)>,
}

impl CategoryRules {
    pub fn new(rules: Vec<(String, Vec<String>)>) -> Self {
        Self { rules }
    }

    /// Assign a category to a channel name. Total: always returns a label.
    pub fn categorize(&self, name: &str) -> &str {
        let lowered = name.to_lowercase();
        for (label, keywords) in &self.rules {
            if keywords.iter().any(|kw| lowered.contains(kw.as_str())) {
                return label;
            }
        }
        FALLBACK_CATEGORY
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        // Keywords are stored lowercased; matching is substring based.
        let table: &[(&str, &[&str])] = &[
            (
                "Sports",
                &[
                    "sport", "espn", "football", "soccer", "nba", "nfl", "mlb", "nhl", "ufc",
                    "boxing", "golf", "tennis", "cricket", "racing", "f1", "dazn", "bein",
                ],
            ),
            (
                "News",
                &["news", "cnn", "bbc world", "sky news", "fox news", "msnbc", "al jazeera"],
            ),
            (
                "Movies",
                &["movie", "cinema", "film", "hbo", "showtime", "starz", "paramount"],
            ),
            (
                "Kids",
                &["kids", "cartoon", "nick", "disney", "boomerang", "baby"],
            ),
            ("Music", &["music", "mtv", "vevo", "hits", "radio"]),
            (
                "Documentary",
                &["discovery", "documentary", "nat geo", "national geographic", "history"],
            ),
            (
                "UK",
                &["bbc", "itv", "channel 4", "channel 5", "sky one", "dave", " uk"],
            ),
            (
                "USA",
                &["abc", "cbs", "fox", "nbc", "cw", "usa network", " us"],
            ),
        ];

        Self::new(
            table
                .iter()
                .map(|(label, keywords)| {
                    (
                        label.to_string(),
                        keywords.iter().map(|kw| kw.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_row_wins() {
        let rules = CategoryRules::default();
        // "BBC Sport" matches Sports before UK because Sports is declared first.
        assert_eq!(rules.categorize("BBC Sport HD"), "Sports");
        assert_eq!(rules.categorize("BBC One"), "UK");
    }

    #[test]
    fn test_case_insensitive() {
        let rules = CategoryRules::default();
        assert_eq!(rules.categorize("sky NEWS"), "News");
        assert_eq!(rules.categorize("Sky News"), "News");
    }

    #[test]
    fn test_unmatched_yields_other() {
        let rules = CategoryRules::default();
        assert_eq!(rules.categorize("Zxqw 9000"), FALLBACK_CATEGORY);
        assert_eq!(rules.categorize(""), FALLBACK_CATEGORY);
    }

    #[test]
    fn test_deterministic() {
        let rules = CategoryRules::default();
        let first = rules.categorize("ESPN 2").to_string();
        for _ in 0..3 {
            assert_eq!(rules.categorize("ESPN 2"), first);
        }
    }

    #[test]
    fn test_custom_rules_row_order() {
        let rules = CategoryRules::new(vec![
            ("A".to_string(), vec!["shared".to_string()]),
            ("B".to_string(), vec!["shared".to_string()]),
        ]);
        assert_eq!(rules.categorize("a SHARED name"), "A");
    }
}
