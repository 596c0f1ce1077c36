use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use panelmenu_types::AppDescriptor;
use tracing::debug;

use super::SearchHit;

/// Fuzzy matcher over installed applications
pub struct SearchEngine {
    matcher: Matcher,
    weights: MatchWeights,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("weights", &self.weights)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchWeights {
    /// Maximum results to return
    pub limit: usize,

    /// Weight for display name matches
    pub name_weight: f64,

    /// Weight for id and keyword matches
    pub keyword_weight: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            limit: 30,
            name_weight: 1.0,
            keyword_weight: 0.3,
        }
    }
}

impl SearchEngine {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self::with_weights(MatchWeights {
            limit,
            ..MatchWeights::default()
        })
    }

    #[must_use]
    pub fn with_weights(weights: MatchWeights) -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            weights,
        }
    }

    #[must_use]
    pub fn weights(&self) -> MatchWeights {
        self.weights
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.weights.limit = limit;
    }

    /// Rank `apps` against `query`, best first. A blank query matches nothing.
    pub fn search(&mut self, query: &str, apps: &[AppDescriptor]) -> Vec<SearchHit> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let pattern = Pattern::new(
            query,
            CaseMatching::Smart,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );

        let mut results: Vec<SearchHit> = apps
            .iter()
            .filter_map(|app| self.score_app(&pattern, query, app))
            .collect();

        debug!("Search '{}' matched {} apps", query, results.len());

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        results.truncate(self.weights.limit);
        results
    }

    /// An app matches on its name or, more weakly, on its id and keywords.
    fn score_app(&mut self, pattern: &Pattern, query: &str, app: &AppDescriptor) -> Option<SearchHit> {
        let mut buf = Vec::new();
        let name_score = pattern.score(Utf32Str::new(&app.name, &mut buf), &mut self.matcher);

        let mut keywords_text = app.id.trim_end_matches(".desktop").to_string();
        for keyword in &app.keywords {
            keywords_text.push(' ');
            keywords_text.push_str(keyword);
        }
        let mut kw_buf = Vec::new();
        let keyword_score = pattern.score(Utf32Str::new(&keywords_text, &mut kw_buf), &mut self.matcher);

        if name_score.is_none() && keyword_score.is_none() {
            return None;
        }

        let score = f64::from(name_score.unwrap_or(0)) * self.weights.name_weight
            + f64::from(keyword_score.unwrap_or(0)) * self.weights.keyword_weight
            + Self::name_match_bonus(query, &app.name);

        Some(SearchHit {
            id: app.id.clone(),
            name: app.name.clone(),
            score,
        })
    }

    /// Bonus for names the query spells out from the start:
    /// +500 for an exact match, +250..+499 for a prefix by coverage.
    // String lengths are usize, coverage ratio uses f64 for precision
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn name_match_bonus(query: &str, name: &str) -> f64 {
        let query_lower = query.to_lowercase();
        let name_lower = name.to_lowercase();

        if query_lower == name_lower {
            return 500.0;
        }

        if name_lower.starts_with(&query_lower) {
            let coverage = query.len() as f64 / name.len() as f64;
            return 250.0 + (coverage * 250.0);
        }

        0.0
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::with_weights(MatchWeights::default())
    }
}
