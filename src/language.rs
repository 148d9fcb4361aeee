//! Catalog model and the rule-based ordering used during language resolution.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::fuzzy::FuzzySearchStrategy;
use crate::matcher::{ExactMatcher, Matcher, PartialMatcher};
use crate::values::Language;

/// One raw row of the documentation service's `docs.json`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CatalogRecord {
    pub name: String,
    pub slug: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub mtime: Option<i64>,
    #[serde(default)]
    pub db_size: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Available,
    Downloading,
    Downloaded,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub version: String,
    pub slug: String,
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    pub download_status: DownloadStatus,
    pub path: String,
}

/// A documented language with every version the catalog knows about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLanguage {
    pub name: String,
    pub display_name: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub alias: String,
    pub versions: Vec<DocumentVersion>,
}

impl DocumentLanguage {
    /// Groups raw catalog rows by slug base (`python~3.12` -> `python`).
    ///
    /// The first row seen for a language fixes its display name, type, alias
    /// and position. Rows without a version, or with version `latest`, become
    /// `latest` and are marked as the default.
    pub fn group(records: Vec<CatalogRecord>, docs_base: &str) -> Vec<DocumentLanguage> {
        let docs_base = docs_base.trim_end_matches('/');
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut languages: Vec<DocumentLanguage> = Vec::new();

        for record in records {
            let name = record
                .slug
                .split('~')
                .next()
                .unwrap_or(&record.slug)
                .to_lowercase();
            let raw_version = record.version.trim();
            let is_default = raw_version.is_empty() || raw_version.eq_ignore_ascii_case("latest");
            let version = DocumentVersion {
                version: if is_default {
                    "latest".to_string()
                } else {
                    raw_version.to_string()
                },
                path: format!("{docs_base}/docs/{}", record.slug),
                slug: record.slug.clone(),
                is_default,
                release: record.release.clone(),
                download_status: DownloadStatus::Available,
            };

            match positions.get(&name) {
                Some(&idx) => languages[idx].versions.push(version),
                None => {
                    positions.insert(name.clone(), languages.len());
                    languages.push(DocumentLanguage {
                        name,
                        display_name: record.name,
                        slug: record.slug,
                        kind: record.kind,
                        alias: record.alias.unwrap_or_default(),
                        versions: vec![version],
                    });
                }
            }
        }

        for language in &mut languages {
            if let Some(default) = language.versions.iter().find(|v| v.is_default) {
                language.slug = default.slug.clone();
            }
        }
        languages
    }

    /// Versions sorted newest first by natural ordering.
    pub fn versions_newest_first(&self) -> Vec<&DocumentVersion> {
        let mut versions: Vec<&DocumentVersion> = self.versions.iter().collect();
        versions.sort_by(|a, b| ExactMatcher.compare(&b.version, &a.version));
        versions
    }

    /// Newest version by natural ordering.
    pub fn latest_version(&self) -> Option<&DocumentVersion> {
        self.versions_newest_first().into_iter().next()
    }

    pub fn field(&self, field: LanguageField) -> &str {
        match field {
            LanguageField::Name => &self.name,
            LanguageField::DisplayName => &self.display_name,
            LanguageField::Slug => &self.slug,
            LanguageField::Type => &self.kind,
            LanguageField::Alias => &self.alias,
            LanguageField::Version => self
                .latest_version()
                .map(|v| v.version.as_str())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageField {
    Name,
    DisplayName,
    Slug,
    Type,
    Alias,
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// One key of a multi-key sort.
#[derive(Debug, Clone)]
pub struct OrderRule {
    pub field: LanguageField,
    pub matcher: Arc<dyn Matcher>,
    pub direction: Direction,
}

impl OrderRule {
    /// Builds a rule that compares `field` of two languages with `matcher`.
    ///
    /// # Arguments
    ///
    /// * `field` - which language field to read
    /// * `matcher` - exact or partial comparison
    /// * `direction` - `Desc` reverses the matcher's ordering
    pub fn new(field: LanguageField, matcher: Arc<dyn Matcher>, direction: Direction) -> Self {
        Self {
            field,
            matcher,
            direction,
        }
    }

    fn compare(&self, a: &DocumentLanguage, b: &DocumentLanguage) -> Ordering {
        let ord = self.matcher.compare(a.field(self.field), b.field(self.field));
        match self.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    }
}

/// Exact rules before partial ones, name before type before alias, and
/// versions last and descending so newer releases lead among equals.
pub fn canonical_order_rules() -> Vec<OrderRule> {
    let exact: Arc<dyn Matcher> = Arc::new(ExactMatcher);
    let partial: Arc<dyn Matcher> = Arc::new(PartialMatcher);
    vec![
        OrderRule::new(LanguageField::Name, exact.clone(), Direction::Asc),
        OrderRule::new(LanguageField::Type, exact.clone(), Direction::Asc),
        OrderRule::new(LanguageField::Alias, exact.clone(), Direction::Asc),
        OrderRule::new(LanguageField::Name, partial.clone(), Direction::Asc),
        OrderRule::new(LanguageField::Type, partial.clone(), Direction::Asc),
        OrderRule::new(LanguageField::Alias, partial.clone(), Direction::Asc),
        OrderRule::new(LanguageField::Version, exact, Direction::Desc),
        OrderRule::new(LanguageField::Version, partial, Direction::Desc),
    ]
}

/// Immutable ordered view over catalog languages.
///
/// Every operation returns a fresh collection and leaves `self` untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentLanguageCollection {
    items: Vec<DocumentLanguage>,
}

impl DocumentLanguageCollection {
    /// Wraps languages in the order given.
    pub fn from(languages: Vec<DocumentLanguage>) -> Self {
        Self { items: languages }
    }

    /// Stable sort comparing each pair rule by rule until one decides.
    pub fn order_by_rules(&self, rules: &[OrderRule]) -> Self {
        let mut ordered = self.items.clone();
        ordered.sort_by(|a, b| {
            rules
                .iter()
                .map(|rule| rule.compare(a, b))
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        Self { items: ordered }
    }

    /// Languages the strategy accepts for `term`, best match first.
    ///
    /// # Arguments
    ///
    /// * `term` - the language hint to approximate
    /// * `strategy` - scoring used to accept and rank candidates
    ///
    /// # Returns
    ///
    /// A new collection, empty when nothing is close enough.
    pub fn find_by_fuzzy_search(
        &self,
        term: &Language,
        strategy: &dyn FuzzySearchStrategy,
    ) -> Self {
        Self {
            items: strategy.search(&self.items, term),
        }
    }

    /// The first `count` languages.
    pub fn take(&self, count: usize) -> Self {
        Self {
            items: self.items.iter().take(count).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn first(&self) -> Option<&DocumentLanguage> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DocumentLanguage> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<DocumentLanguage> {
        self.items.clone()
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|l| l.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a DocumentLanguageCollection {
    type Item = &'a DocumentLanguage;
    type IntoIter = std::slice::Iter<'a, DocumentLanguage>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
