//! Live application search.

mod engine;

pub use engine::{MatchWeights, SearchEngine};

use panelmenu_types::AppDescriptor;
use serde::Serialize;

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub score: f64,
}

/// Query and results of one surface's search box
#[derive(Debug, Default)]
pub struct SearchSession {
    engine: SearchEngine,
    query: String,
    results: Vec<SearchHit>,
}

impl SearchSession {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            engine: SearchEngine::new(limit),
            query: String::new(),
            results: Vec::new(),
        }
    }

    /// Replace the query and re-rank. Returns whether a search is now active.
    pub fn update(&mut self, query: &str, apps: &[AppDescriptor]) -> bool {
        self.query = query.to_string();
        self.results = self.engine.search(query, apps);
        self.is_active()
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.engine.set_limit(limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let apps = vec![AppDescriptor {
            id: "files.desktop".to_string(),
            name: "Files".to_string(),
            ..Default::default()
        }];
        let mut session = SearchSession::new(10);

        assert!(session.update("fil", &apps));
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.query(), "fil");

        session.clear();
        assert!(!session.is_active());
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_whitespace_query_is_inactive() {
        let mut session = SearchSession::new(10);
        assert!(!session.update("  ", &[]));
    }
}
