//! DevDocs MCP implementation.
//!
//! This module exposes language resolution and documentation search as MCP
//! tools. The heavy lifting lives in [`DevDocsManager`]; the tools here only
//! validate raw arguments and render results.
//!
//! # Main Components
//!
//! - [`DevDocsServer`]: tool box and `ServerHandler` implementation
//! - [`SearchSpecificDocsParams`], [`ViewAvailableDocsParams`], [`SearchDocsParams`]: tool inputs
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use devdocs_mcp::config::Config;
//! use devdocs_mcp::manager::DevDocsManager;
//! use devdocs_mcp::mcp::DevDocsServer;
//!
//! let manager = Arc::new(DevDocsManager::from_config(&Config::default()));
//! let server = DevDocsServer::new(manager);
//! ```

use std::sync::Arc;

use rmcp::model::{
    AnnotateAble, Implementation, ListPromptsResult, ListResourcesResult, PaginatedRequestParam,
    ProtocolVersion, RawResource, ReadResourceRequestParam, ReadResourceResult, Resource,
    ResourceContents, ServerCapabilities,
};
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler, model::ServerInfo, schemars, tool};
use serde::{Deserialize, Serialize};

use crate::converters::{self, McpResponse};
use crate::error::AppError;
use crate::input::LanguageVersionInput;
use crate::manager::{DevDocsManager, MAX_RESOLVED_CANDIDATES};
use crate::values::{Limit, LimitBounds, Query, Slug};

/// URI of the resource listing every catalog language.
pub const LANGUAGES_RESOURCE_URI: &str = "devdocs://languages";

const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchSpecificDocsParams {
    #[schemars(description = "Exact DevDocs slug, e.g. openjdk~21 or python~3.12")]
    pub slug: String,
    #[schemars(description = "Text to search within the documentation index")]
    pub query: String,
    #[schemars(description = "Maximum number of results (1-50, default 10)")]
    pub limit: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ViewAvailableDocsParams {
    #[schemars(description = "Language to look up, e.g. 'python 3.12' or 'js'. If empty, the first 20 available languages are listed.")]
    pub language: Option<String>,
    #[schemars(description = "Version of the language, e.g. 3.12")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchDocsParams {
    #[schemars(description = "Language name or alias, optionally with a version, e.g. 'java 17'")]
    pub language: String,
    #[schemars(description = "Version of the language, overrides one given in the language text")]
    pub version: Option<String>,
    #[schemars(description = "Text to search within the documentation index")]
    pub query: String,
    #[schemars(description = "Maximum number of results (1-50, default 10)")]
    pub limit: Option<serde_json::Value>,
}

/// MCP server resolving and searching DevDocs documentation.
#[derive(Clone)]
pub struct DevDocsServer {
    manager: Arc<DevDocsManager>,
}

#[tool(tool_box)]
impl DevDocsServer {
    pub fn new(manager: Arc<DevDocsManager>) -> Self {
        Self { manager }
    }

    /// Searches one documentation set by its exact slug.
    #[tool(description = "Search DevDocs by explicit slug (e.g., openjdk~21) and query")]
    async fn search_specific_docs(
        &self,
        #[tool(aggr)] params: SearchSpecificDocsParams,
    ) -> Result<McpResponse, McpResponse> {
        tracing::info!("Searching by slug: {} for query: {}", params.slug, params.query);
        let result = async {
            let slug = Slug::create(&params.slug)?;
            let query = Query::create(&params.query)?;
            let limit = Limit::from_json(params.limit.as_ref(), LimitBounds::default());
            let hits = self
                .manager
                .search_documentation_by_slug(&slug, &query, limit)
                .await?;
            Ok::<_, AppError>(converters::search_response(&hits, slug.as_str(), query.as_str()))
        }
        .await;

        result.map_err(|err| {
            tracing::error!("Search by slug failed: {}", err);
            match err {
                AppError::BadRequest { .. } => {
                    converters::error_response(format!("input parameter error: {err}"))
                }
                _ => converters::error_response(format!("Search by slug failed: {err}")),
            }
        })
    }

    /// Lists the catalog, or resolves a language hint to ranked candidates.
    #[tool(description = "View available documentation languages. If a language is given, resolve it to matching DevDocs slugs; otherwise return the first 20 languages in JSON format with their slugs.")]
    async fn view_available_docs(
        &self,
        #[tool(aggr)] params: ViewAvailableDocsParams,
    ) -> Result<McpResponse, McpResponse> {
        let language = params.language.as_deref().unwrap_or("").trim().to_string();
        tracing::info!(
            "Checking docs availability for: {}{}",
            language,
            params.version.as_deref().map(|v| format!(" v{v}")).unwrap_or_default()
        );

        let result = async {
            if language.is_empty() {
                let catalog = self.manager.get_available_list().await?;
                return Ok(converters::available_languages_response(
                    &catalog.take(MAX_RESOLVED_CANDIDATES),
                ));
            }
            let input = LanguageVersionInput::create(&language, params.version.as_deref())?;
            let resolved = self.manager.resolve_language(&input).await?;
            Ok::<_, AppError>(converters::resolved_language_response(&resolved))
        }
        .await;

        match result {
            Ok(response) => Ok(response),
            Err(AppError::NotFound(message)) => {
                tracing::warn!("{}", message);
                Err(self.language_not_found(&language).await)
            }
            Err(err @ AppError::BadRequest { .. }) => Err(converters::error_response(format!(
                "input parameter error: {err}"
            ))),
            Err(err) => {
                tracing::error!("Failed to check docs availability: {}", err);
                Err(converters::error_response(format!(
                    "Failed to check docs availability: {err}"
                )))
            }
        }
    }

    /// Resolves a language and searches its documentation in one step.
    #[tool(description = "Search documentation for a language (e.g. 'python 3.12', 'js') without knowing its DevDocs slug")]
    async fn search_docs(
        &self,
        #[tool(aggr)] params: SearchDocsParams,
    ) -> Result<McpResponse, McpResponse> {
        let result = async {
            let input = LanguageVersionInput::create(&params.language, params.version.as_deref())?;
            let query = Query::create(&params.query)?;
            let limit = Limit::from_json(params.limit.as_ref(), LimitBounds::default());
            let (resolved, hits) = self
                .manager
                .search_documentation(&input, &query, limit)
                .await?;
            Ok::<_, AppError>(converters::search_response(&hits, resolved.slug(), query.as_str()))
        }
        .await;

        match result {
            Ok(response) => Ok(response),
            Err(AppError::NotFound(_)) => Err(self.language_not_found(&params.language).await),
            Err(err @ AppError::BadRequest { .. }) => Err(converters::error_response(format!(
                "input parameter error: {err}"
            ))),
            Err(err) => {
                tracing::error!("Search failed: {}", err);
                Err(converters::error_response(format!("Search failed: {err}")))
            }
        }
    }

    async fn language_not_found(&self, language: &str) -> McpResponse {
        let available = self.manager.get_available_list().await.ok();
        let names = available.as_ref().map(|c| c.names()).unwrap_or_default();
        converters::language_not_found(language, &names)
    }
}

impl DevDocsServer {
    /// Resources this server can read.
    pub fn resources(&self) -> Vec<Resource> {
        let mut languages = RawResource::new(LANGUAGES_RESOURCE_URI, "Available Languages");
        languages.description =
            Some("List of languages and versions available in DevDocs".to_string());
        languages.mime_type = Some(JSON_MIME_TYPE.to_string());
        vec![languages.no_annotation()]
    }

    /// Reads a resource by URI.
    ///
    /// # Arguments
    ///
    /// * `uri` - resource URI, as listed by [`DevDocsServer::resources`]
    ///
    /// # Returns
    ///
    /// The full catalog as pretty JSON for [`LANGUAGES_RESOURCE_URI`]; a
    /// `resource_not_found` error for any other URI.
    pub async fn read_resource_uri(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        tracing::debug!("Reading resource: {}", uri);
        if uri != LANGUAGES_RESOURCE_URI {
            return Err(McpError::resource_not_found(
                format!("Unknown resource: {uri}"),
                None,
            ));
        }

        let catalog = self.manager.get_available_list().await.map_err(|err| {
            tracing::error!("Failed to read {}: {}", uri, err);
            McpError::internal_error(format!("Failed to get available languages: {err}"), None)
        })?;
        let body = converters::available_languages_response(&catalog);

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: Some(JSON_MIME_TYPE.to_string()),
                text: body.text,
            }],
        })
    }
}

#[tool(tool_box)]
impl ServerHandler for DevDocsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "This server searches documentation hosted by DevDocs. \
                Use 'view_available_docs' to find the slug of a language (e.g. 'python 3.12' -> python~3.12), \
                then 'search_specific_docs' with that slug and a query. \
                'search_docs' does both steps at once. \
                The devdocs://languages resource lists the whole catalog.".to_string()
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: PaginatedRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            next_cursor: None,
            resources: self.resources(),
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_resource_uri(&uri).await
    }

    async fn list_prompts(
        &self,
        _request: PaginatedRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult {
            next_cursor: None,
            prompts: vec![],
        })
    }
}
