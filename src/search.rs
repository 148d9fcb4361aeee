use serde::Serialize;

use crate::values::{Limit, Query, Slug};

/// A single documentation entry within one slug's index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub slug: Slug,
}

/// Ordered hits of one index, or a filtered subset of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchHits(Vec<SearchHit>);

impl SearchHits {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self(hits)
    }

    /// Hits whose title or path contains `query` (case-insensitive), at most `limit` of them.
    pub fn extract(&self, query: &Query, limit: Limit) -> SearchHits {
        let needle = query.as_str().to_lowercase();
        let extracted = self
            .0
            .iter()
            .filter(|hit| {
                format!("{} {}", hit.title, hit.path)
                    .to_lowercase()
                    .contains(&needle)
            })
            .take(limit.get())
            .cloned()
            .collect();
        SearchHits(extracted)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchHit> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[SearchHit] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a SearchHits {
    type Item = &'a SearchHit;
    type IntoIter = std::slice::Iter<'a, SearchHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
