//! DevDocs Documentation MCP Service
//!
//! This crate provides a Model Context Protocol (MCP) service for looking up
//! documentation hosted by DevDocs. It resolves loose language hints such as
//! "python 3.12" or "js" to a documentation slug and searches that slug's
//! index by title and path.
//!
//! # Features
//!
//! - Resolve a language/version hint to ranked catalog candidates
//! - Fuzzy fallback for misspelled language names
//! - Search a documentation index by slug, with bounded results
//! - MCP server over stdio or SSE
//!
//! # Modules
//!
//! - [`values`]: validated value objects (slug, query, limit, language, version)
//! - [`matcher`], [`language`], [`fuzzy`]: catalog ordering and matching
//! - [`search`]: search hits and their extraction
//! - [`devdocs`]: HTTP access to a DevDocs instance
//! - [`manager`]: resolution and search orchestration
//! - [`mcp`], [`server`]: MCP tools and transports

pub mod config;
pub mod converters;
pub mod devdocs;
pub mod error;
pub mod fuzzy;
pub mod input;
pub mod language;
pub mod manager;
pub mod matcher;
pub mod mcp;
pub mod search;
pub mod server;
pub mod values;
