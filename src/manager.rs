//! Orchestration of catalog lookup, language resolution and slug search.

use std::sync::Arc;

use itertools::Itertools;

use crate::config::Config;
use crate::devdocs::{DevDocsRepository, HttpDevDocsRepository};
use crate::error::AppError;
use crate::fuzzy::{FuzzySearchStrategy, WeightedFuzzySearchStrategy};
use crate::input::LanguageVersionInput;
use crate::language::{
    DocumentLanguage, DocumentLanguageCollection, DocumentVersion, canonical_order_rules,
};
use crate::search::SearchHits;
use crate::values::{Limit, Query, Slug, Version};

/// Upper bound on candidates returned by [`DevDocsManager::resolve_language`].
pub const MAX_RESOLVED_CANDIDATES: usize = 20;

const EXACT_MATCH_BONUS: u32 = 10;
const NAME_WEIGHT: u32 = 100;
const DISPLAY_NAME_WEIGHT: u32 = 95;
const SLUG_WEIGHT: u32 = 90;
const ALIAS_WEIGHT: u32 = 85;
const TYPE_WEIGHT: u32 = 20;

/// Outcome of resolving a free-text language hint.
#[derive(Debug, Clone)]
pub struct ResolvedLanguage {
    /// Ranked candidates, best first.
    pub candidates: DocumentLanguageCollection,
    pub language: DocumentLanguage,
    pub version: Option<DocumentVersion>,
}

impl ResolvedLanguage {
    /// Slug of the chosen version, or of the language when none was chosen.
    pub fn slug(&self) -> &str {
        self.version
            .as_ref()
            .map(|v| v.slug.as_str())
            .unwrap_or(&self.language.slug)
    }
}

/// Entry point for catalog listing, language resolution and search.
///
/// Holds its collaborators behind `Arc` so one manager can be shared by every
/// MCP session.
pub struct DevDocsManager {
    repository: Arc<dyn DevDocsRepository>,
    fuzzy: Arc<dyn FuzzySearchStrategy>,
}

impl DevDocsManager {
    /// Creates a manager from explicit collaborators.
    ///
    /// # Arguments
    ///
    /// * `repository` - source of the catalog and per-slug indexes
    /// * `fuzzy` - fallback used when no catalog field relates to the input
    pub fn new(repository: Arc<dyn DevDocsRepository>, fuzzy: Arc<dyn FuzzySearchStrategy>) -> Self {
        Self { repository, fuzzy }
    }

    /// HTTP repository and weighted fuzzy search configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        let repository = HttpDevDocsRepository::with_urls(&config.base_url, config.docs_url());
        Self::new(
            Arc::new(repository),
            Arc::new(WeightedFuzzySearchStrategy::new(config.fuzzy_threshold)),
        )
    }

    /// The full catalog. An empty catalog is reported as not found.
    pub async fn get_available_list(&self) -> Result<DocumentLanguageCollection, AppError> {
        let languages = self
            .repository
            .fetch_catalog()
            .await
            .map_err(|e| AppError::internal("Error fetching available languages", e))?;
        if languages.is_empty() {
            return Err(AppError::not_found("No available languages found from DevDocs"));
        }
        Ok(DocumentLanguageCollection::from(languages))
    }

    /// Maps a language hint to ranked catalog candidates and picks a version
    /// of the best one.
    ///
    /// Languages are scored on how their fields relate to the hint; when none
    /// scores, the fuzzy strategy gets a chance before giving up.
    ///
    /// # Arguments
    ///
    /// * `input` - normalised language with an optional version hint
    ///
    /// # Returns
    ///
    /// At most [`MAX_RESOLVED_CANDIDATES`] candidates with the chosen language
    /// and version, `AppError::NotFound` when nothing matches, or
    /// `AppError::Internal` when the catalog cannot be fetched.
    pub async fn resolve_language(
        &self,
        input: &LanguageVersionInput,
    ) -> Result<ResolvedLanguage, AppError> {
        let catalog = self.get_available_list().await?;
        let probe = input.language().to_lowercase();
        let ordered = catalog.order_by_rules(&canonical_order_rules());

        let mut scored: Vec<(u32, &DocumentLanguage)> = ordered
            .iter()
            .map(|language| (score_language(language, &probe), language))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let candidates = if scored.is_empty() {
            tracing::info!(input = %probe, "No direct match, falling back to fuzzy search");
            ordered.find_by_fuzzy_search(input.language(), self.fuzzy.as_ref())
        } else {
            tracing::debug!(
                "resolve_language candidates=[{}]",
                scored
                    .iter()
                    .map(|(score, language)| format!("{}:{}", language.name, score))
                    .join(",")
            );
            DocumentLanguageCollection::from(
                scored.into_iter().map(|(_, language)| language.clone()).collect(),
            )
        };

        let candidates = candidates.take(MAX_RESOLVED_CANDIDATES);
        let Some(language) = candidates.first().cloned() else {
            return Err(AppError::not_found(format!(
                "No matching language found for input: \"{}\"",
                input.language()
            )));
        };

        let version = choose_version(&language, input.version()).cloned();
        tracing::info!(
            input = %probe,
            selected = %language.name,
            version = version.as_ref().map(|v| v.version.as_str()).unwrap_or(""),
            candidates = candidates.len(),
            "Resolved language"
        );

        Ok(ResolvedLanguage {
            candidates,
            language,
            version,
        })
    }

    /// Searches one documentation set by its explicit slug.
    ///
    /// # Returns
    ///
    /// Matching hits in index order, possibly none. Fetch and parse failures
    /// become `AppError::Internal`.
    pub async fn search_documentation_by_slug(
        &self,
        slug: &Slug,
        query: &Query,
        limit: Limit,
    ) -> Result<SearchHits, AppError> {
        tracing::info!("Searching by slug \"{}\" for query \"{}\"", slug, query);
        let hits = self
            .repository
            .fetch_index(slug)
            .await
            .map_err(|e| AppError::internal("Error searching by slug", e))?;
        let extracted = hits.extract(query, limit);
        tracing::info!(
            %slug,
            total = hits.len(),
            found = extracted.len(),
            "Found {} search results by slug",
            extracted.len()
        );
        Ok(extracted)
    }

    /// Resolves the language first, then searches the resolved slug.
    pub async fn search_documentation(
        &self,
        input: &LanguageVersionInput,
        query: &Query,
        limit: Limit,
    ) -> Result<(ResolvedLanguage, SearchHits), AppError> {
        let resolved = self.resolve_language(input).await?;
        let slug = Slug::create(resolved.slug())?;
        let hits = self.search_documentation_by_slug(&slug, query, limit).await?;
        Ok((resolved, hits))
    }
}

/// Best field score for `probe`, 0 when no field relates to it.
fn score_language(language: &DocumentLanguage, probe: &str) -> u32 {
    [
        (language.name.as_str(), NAME_WEIGHT),
        (language.display_name.as_str(), DISPLAY_NAME_WEIGHT),
        (language.slug.as_str(), SLUG_WEIGHT),
        (language.alias.as_str(), ALIAS_WEIGHT),
        (language.kind.as_str(), TYPE_WEIGHT),
    ]
    .into_iter()
    .filter(|(field, _)| !field.is_empty())
    .map(|(field, weight)| {
        let field = field.to_lowercase();
        if field == probe {
            weight + EXACT_MATCH_BONUS
        } else if field.contains(probe) {
            weight
        } else {
            0
        }
    })
    .max()
    .unwrap_or(0)
}

/// Exact hint, then a version containing the hint, then the default, then the newest.
fn choose_version<'a>(
    language: &'a DocumentLanguage,
    hint: Option<&Version>,
) -> Option<&'a DocumentVersion> {
    let versions = language.versions_newest_first();

    if let Some(hint) = hint {
        let matched = versions
            .iter()
            .find(|v| v.version == hint.as_str())
            .or_else(|| versions.iter().find(|v| hint.is_contained_in(&v.version)));
        if let Some(version) = matched {
            return Some(*version);
        }
        tracing::warn!(
            language = %language.name,
            hint = %hint,
            "Requested version not found, using default"
        );
    }

    versions
        .iter()
        .find(|v| v.is_default)
        .or_else(|| versions.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::devdocs::DevDocsError;
    use crate::language::tests::{record, sample_catalog};
    use crate::language::DownloadStatus;
    use crate::search::SearchHit;
    use crate::values::LimitBounds;

    struct StubRepository {
        catalog: Vec<DocumentLanguage>,
        hits: Vec<SearchHit>,
        fail: bool,
    }

    #[async_trait]
    impl DevDocsRepository for StubRepository {
        async fn fetch_catalog(&self) -> Result<Vec<DocumentLanguage>, DevDocsError> {
            if self.fail {
                return Err(DevDocsError::UrlError(url::ParseError::EmptyHost));
            }
            Ok(self.catalog.clone())
        }

        async fn fetch_index(&self, slug: &Slug) -> Result<SearchHits, DevDocsError> {
            if self.fail {
                return Err(DevDocsError::UrlError(url::ParseError::EmptyHost));
            }
            Ok(SearchHits::new(
                self.hits.iter().filter(|h| &h.slug == slug).cloned().collect(),
            ))
        }
    }

    fn manager(catalog: Vec<DocumentLanguage>) -> DevDocsManager {
        manager_with_hits(catalog, Vec::new())
    }

    fn manager_with_hits(catalog: Vec<DocumentLanguage>, hits: Vec<SearchHit>) -> DevDocsManager {
        DevDocsManager::new(
            Arc::new(StubRepository {
                catalog,
                hits,
                fail: false,
            }),
            Arc::new(WeightedFuzzySearchStrategy::default()),
        )
    }

    fn hit(slug: &str, title: &str, path: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            url: format!("https://devdocs.io/{slug}/{path}"),
            path: path.to_string(),
            kind: String::new(),
            slug: Slug::create(slug).unwrap(),
        }
    }

    async fn resolve(manager: &DevDocsManager, language: &str, version: Option<&str>) -> ResolvedLanguage {
        let input = LanguageVersionInput::create(language, version).unwrap();
        manager.resolve_language(&input).await.unwrap()
    }

    #[tokio::test]
    async fn test_resolve_prefers_newest_version() {
        let mut catalog = DocumentLanguage::group(
            vec![
                record("Python", "python~3.12", "programming", "3.12"),
                record("Python", "python~3.9", "programming", "3.9"),
            ],
            "https://devdocs.io",
        );
        catalog[0].versions[0].is_default = true;

        let resolved = resolve(&manager(catalog), "python", None).await;
        assert_eq!(resolved.language.name, "python");
        assert_eq!(resolved.version.unwrap().version, "3.12");
    }

    fn python_versions(default_on_newest: bool) -> DocumentLanguage {
        let version = |v: &str, is_default: bool| DocumentVersion {
            version: v.to_string(),
            slug: format!("python~{v}"),
            is_default,
            release: None,
            download_status: DownloadStatus::Available,
            path: format!("https://devdocs.io/docs/python~{v}"),
        };
        DocumentLanguage {
            name: "python".to_string(),
            display_name: "Python".to_string(),
            slug: "python~3.12".to_string(),
            kind: "programming".to_string(),
            alias: String::new(),
            versions: vec![version("3.12", default_on_newest), version("3.9", false)],
        }
    }

    #[tokio::test]
    async fn test_resolve_uses_default_flag_from_data() {
        let resolved = resolve(&manager(vec![python_versions(true)]), "python", None).await;
        assert_eq!(resolved.slug(), "python~3.12");

        let resolved = resolve(&manager(vec![python_versions(false)]), "python", None).await;
        assert_eq!(resolved.slug(), "python~3.12");
    }

    #[tokio::test]
    async fn test_resolve_newest_when_older_record_has_no_type() {
        for older_first in [false, true] {
            let newer = record("python", "python~3.12", "programming", "3.12");
            let older = record("python", "python~3.9", "", "3.9");
            let records = if older_first {
                vec![older, newer]
            } else {
                vec![newer, older]
            };
            let catalog = DocumentLanguage::group(records, "https://devdocs.io");

            let resolved = resolve(&manager(catalog), "python", None).await;
            assert_eq!(resolved.language.name, "python");
            assert_eq!(resolved.slug(), "python~3.12", "older record first: {older_first}");
            assert_eq!(resolved.candidates.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_resolve_without_default_picks_newest() {
        let resolved = resolve(&manager(sample_catalog()), "openjdk", None).await;
        assert_eq!(resolved.slug(), "openjdk~21");
    }

    #[tokio::test]
    async fn test_resolve_unknown_language_is_not_found() {
        let input = LanguageVersionInput::create("xyzzy", None).unwrap();
        let err = manager(sample_catalog())
            .resolve_language(&input)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
        assert!(err.to_string().contains("xyzzy"));
    }

    #[tokio::test]
    async fn test_resolve_exact_name_beats_partial() {
        let catalog = DocumentLanguage::group(
            vec![
                record("C++", "cpp", "c", ""),
                record("C", "c", "c", ""),
                record("JavaScript", "javascript", "mdn", ""),
            ],
            "https://devdocs.io",
        );
        let resolved = resolve(&manager(catalog), "C", None).await;
        assert_eq!(resolved.language.name, "c");
        assert_eq!(resolved.candidates.names(), ["c", "cpp", "javascript"]);
    }

    #[tokio::test]
    async fn test_resolve_by_alias_and_display_name() {
        let m = manager(sample_catalog());
        assert_eq!(resolve(&m, "js", None).await.language.name, "javascript");
        assert_eq!(resolve(&m, "OpenJDK", None).await.language.name, "openjdk");
    }

    #[tokio::test]
    async fn test_resolve_with_version_hint() {
        let m = manager(sample_catalog());
        assert_eq!(resolve(&m, "python", Some("3.9")).await.slug(), "python~3.9");
        assert_eq!(resolve(&m, "Python 3.9", None).await.slug(), "python~3.9");
        assert_eq!(resolve(&m, "openjdk~8", None).await.slug(), "openjdk~8");
        // partial hint
        assert_eq!(resolve(&m, "python", Some("3.1")).await.slug(), "python~3.12");
        // unknown hint falls back to newest
        assert_eq!(resolve(&m, "python", Some("2.7")).await.slug(), "python~3.12");
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_fuzzy_search() {
        let resolved = resolve(&manager(sample_catalog()), "pyhton", None).await;
        assert_eq!(resolved.language.name, "python");
    }

    #[tokio::test]
    async fn test_resolve_caps_candidates() {
        let records = (0..30)
            .map(|i| record(&format!("Lib {i}"), &format!("lib{i}"), "lib", ""))
            .collect();
        let catalog = DocumentLanguage::group(records, "https://devdocs.io");
        let resolved = resolve(&manager(catalog), "lib", None).await;
        assert_eq!(resolved.candidates.len(), MAX_RESOLVED_CANDIDATES);
    }

    #[tokio::test]
    async fn test_empty_catalog_is_not_found() {
        let err = manager(Vec::new()).get_available_list().await.unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_repository_failure_is_internal() {
        let m = DevDocsManager::new(
            Arc::new(StubRepository {
                catalog: sample_catalog(),
                hits: Vec::new(),
                fail: true,
            }),
            Arc::new(WeightedFuzzySearchStrategy::default()),
        );
        let err = m.get_available_list().await.unwrap_err();
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert!(err.to_string().starts_with("Error fetching available languages"));

        let slug = Slug::create("python~3.12").unwrap();
        let query = Query::create("list").unwrap();
        let err = m
            .search_documentation_by_slug(&slug, &query, Limit::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_search_by_slug_extracts_hits() {
        let m = manager_with_hits(
            sample_catalog(),
            vec![
                hit("javascript", "Array.prototype.map", "array/map"),
                hit("javascript", "Array.prototype.filter", "array/filter"),
            ],
        );
        let slug = Slug::create("javascript").unwrap();
        let query = Query::create("map").unwrap();
        let limit = Limit::create(10.0, LimitBounds::default());
        let hits = m.search_documentation_by_slug(&slug, &query, limit).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.as_slice()[0].title, "Array.prototype.map");
    }

    #[tokio::test]
    async fn test_search_documentation_resolves_then_searches() {
        let m = manager_with_hits(
            sample_catalog(),
            vec![
                hit("python~3.12", "list.append", "tutorial/datastructures"),
                hit("python~3.9", "list.append", "tutorial/datastructures"),
            ],
        );
        let input = LanguageVersionInput::create("Python", None).unwrap();
        let query = Query::create("append").unwrap();
        let (resolved, hits) = m
            .search_documentation(&input, &query, Limit::default())
            .await
            .unwrap();
        assert_eq!(resolved.slug(), "python~3.12");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.as_slice()[0].slug.as_str(), "python~3.12");
    }

    #[test]
    fn test_score_language_weights() {
        let catalog = sample_catalog();
        let python = &catalog[0];
        assert_eq!(score_language(python, "python"), NAME_WEIGHT + EXACT_MATCH_BONUS);
        assert_eq!(score_language(python, "pyt"), NAME_WEIGHT);
        assert_eq!(score_language(python, "3.12"), SLUG_WEIGHT);
        assert_eq!(score_language(python, "ruby"), 0);
    }
}
