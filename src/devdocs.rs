//! HTTP access to a DevDocs instance: the language catalog and per-slug indexes.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::language::{CatalogRecord, DocumentLanguage};
use crate::search::{SearchHit, SearchHits};
use crate::values::Slug;

pub const DEFAULT_BASE_URL: &str = "https://devdocs.io";

#[derive(Debug, Error)]
pub enum DevDocsError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Documentation not available at {url}: {status}")]
    StatusError { url: String, status: StatusCode },

    #[error("Failed to parse response from {url}: {source}")]
    ParseError {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of catalog and index data. Fetches once and never retries.
#[async_trait]
pub trait DevDocsRepository: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<DocumentLanguage>, DevDocsError>;
    async fn fetch_index(&self, slug: &Slug) -> Result<SearchHits, DevDocsError>;
}

#[derive(Debug, Deserialize)]
struct IndexDocument {
    #[serde(default)]
    entries: Vec<IndexEntry>,
}

#[derive(Debug, Deserialize)]
struct IndexEntry {
    name: Option<String>,
    path: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

pub struct HttpDevDocsRepository {
    client: Client,
    base_url: String,
    docs_url: String,
}

impl HttpDevDocsRepository {
    /// Client whose JSON and hit links share one host.
    ///
    /// # Arguments
    ///
    /// * `base_url` - root of the DevDocs instance, e.g. `https://devdocs.io`
    pub fn new_with_base_url(base_url: &str) -> Self {
        Self::with_urls(base_url, base_url)
    }

    /// `docs_url` is where links in search hits point, which can differ
    /// from the host serving the JSON.
    pub fn with_urls(base_url: &str, docs_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            docs_url: docs_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, DevDocsError> {
        let base = Url::parse(&format!("{}/", self.base_url))?;
        Ok(base.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DevDocsError> {
        tracing::debug!("Fetching {}", url);
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DevDocsError::StatusError {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| DevDocsError::ParseError {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl DevDocsRepository for HttpDevDocsRepository {
    async fn fetch_catalog(&self) -> Result<Vec<DocumentLanguage>, DevDocsError> {
        let url = self.endpoint("docs.json")?;
        let records: Vec<CatalogRecord> = self.get_json(url).await.inspect_err(|e| {
            tracing::error!("Error fetching available languages: {}", e);
        })?;
        let languages = DocumentLanguage::group(records, &self.base_url);
        tracing::info!(languages = languages.len(), "Fetched documentation catalog");
        Ok(languages)
    }

    async fn fetch_index(&self, slug: &Slug) -> Result<SearchHits, DevDocsError> {
        let url = self.endpoint(&format!("docs/{slug}/index.json"))?;
        let document: IndexDocument = self.get_json(url).await.inspect_err(|e| {
            tracing::error!(%slug, "Error fetching documentation index: {}", e);
        })?;

        let hits: Vec<SearchHit> = document
            .entries
            .into_iter()
            .map(|entry| {
                let path = entry.path.unwrap_or_default();
                SearchHit {
                    title: entry.name.unwrap_or_else(|| "Untitled".to_string()),
                    url: format!("{}/{}/{}", self.docs_url, slug, path),
                    path,
                    kind: entry.kind.unwrap_or_default(),
                    slug: slug.clone(),
                }
            })
            .collect();
        tracing::info!(%slug, entries = hits.len(), "Fetched documentation index");
        Ok(SearchHits::new(hits))
    }
}
