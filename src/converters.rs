//! Rendering of manager results as tool output text.

use itertools::Itertools;
use rmcp::model::{Content, IntoContents};
use serde::Serialize;
use serde_json::json;

use crate::language::{DocumentLanguage, DocumentLanguageCollection};
use crate::manager::ResolvedLanguage;
use crate::search::SearchHits;

/// Text returned from a tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpResponse {
    pub text: String,
}

impl McpResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl IntoContents for McpResponse {
    fn into_contents(self) -> Vec<Content> {
        vec![Content::text(self.text)]
    }
}

/// Percent-encodes the characters that break a markdown link target.
pub fn escape_url_for_markdown(url: &str) -> String {
    if url.is_empty() || url == "#" {
        return "#".to_string();
    }

    let mut escaped = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            ' ' => escaped.push_str("%20"),
            '(' => escaped.push_str("%28"),
            ')' => escaped.push_str("%29"),
            '[' => escaped.push_str("%5B"),
            ']' => escaped.push_str("%5D"),
            '{' => escaped.push_str("%7B"),
            '}' => escaped.push_str("%7D"),
            '+' => escaped.push_str("%2B"),
            '|' => escaped.push_str("%7C"),
            '\\' => escaped.push_str("%5C"),
            '^' => escaped.push_str("%5E"),
            '`' => escaped.push_str("%60"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Numbered markdown list of hits, or a short note when there are none.
pub fn search_response(hits: &SearchHits, slug: &str, query: &str) -> McpResponse {
    if hits.is_empty() {
        return McpResponse::new(format!("No results found for \"{query}\" in `{slug}`."));
    }

    let lines = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            let kind = if hit.kind.is_empty() {
                String::new()
            } else {
                format!(" ({})", hit.kind)
            };
            format!(
                "{}. [{}]({}){} - `{}`",
                i + 1,
                hit.title,
                escape_url_for_markdown(&hit.url),
                kind,
                hit.path
            )
        })
        .join("\n");

    McpResponse::new(format!(
        "Found {} results for \"{}\" in `{}`:\n\n{}",
        hits.len(),
        query,
        slug,
        lines
    ))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LanguageSummary<'a> {
    name: &'a str,
    display_name: &'a str,
    slug: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    versions: Vec<&'a str>,
    slugs: Vec<&'a str>,
}

impl<'a> From<&'a DocumentLanguage> for LanguageSummary<'a> {
    fn from(language: &'a DocumentLanguage) -> Self {
        let versions = language.versions_newest_first();
        Self {
            name: &language.name,
            display_name: &language.display_name,
            slug: &language.slug,
            kind: &language.kind,
            versions: versions.iter().map(|v| v.version.as_str()).collect(),
            slugs: versions.iter().map(|v| v.slug.as_str()).collect(),
        }
    }
}

/// Pretty JSON listing of `languages` with every version slug.
pub fn available_languages_response(languages: &DocumentLanguageCollection) -> McpResponse {
    let summaries: Vec<LanguageSummary> = languages.iter().map(LanguageSummary::from).collect();
    let slugs: Vec<&str> = languages
        .iter()
        .flat_map(|l| l.versions.iter().map(|v| v.slug.as_str()))
        .collect();
    let body = json!({
        "count": summaries.len(),
        "languages": summaries,
        "slugs": slugs,
        "instructions": "Use search_specific_docs with one of the slugs to search its documentation.",
    });
    McpResponse::new(to_pretty_json(&body))
}

pub fn resolved_language_response(resolved: &ResolvedLanguage) -> McpResponse {
    let candidates: Vec<LanguageSummary> = resolved
        .candidates
        .iter()
        .map(LanguageSummary::from)
        .collect();
    let body = json!({
        "selected": {
            "name": resolved.language.name,
            "displayName": resolved.language.display_name,
            "slug": resolved.slug(),
            "version": resolved.version.as_ref().map(|v| v.version.as_str()),
        },
        "candidates": candidates,
        "instructions": format!(
            "Use search_specific_docs with slug \"{}\" to search this documentation.",
            resolved.slug()
        ),
    });
    McpResponse::new(to_pretty_json(&body))
}

pub fn language_not_found(language: &str, available: &[&str]) -> McpResponse {
    let mut text = format!("Language \"{language}\" was not found in DevDocs.");
    if !available.is_empty() {
        text.push_str(&format!(
            "\n\nAvailable languages include: {}",
            available.iter().take(50).join(", ")
        ));
    }
    McpResponse::new(text)
}

pub fn error_response(message: impl Into<String>) -> McpResponse {
    McpResponse::new(message)
}

fn to_pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::tests::sample_catalog;
    use crate::search::SearchHit;
    use crate::values::Slug;

    #[test]
    fn test_escape_url_for_markdown() {
        assert_eq!(escape_url_for_markdown(""), "#");
        assert_eq!(escape_url_for_markdown("#"), "#");
        assert_eq!(
            escape_url_for_markdown("https://devdocs.io/cpp/a b(c)[d]{e}+f|g\\h^i`j"),
            "https://devdocs.io/cpp/a%20b%28c%29%5Bd%5D%7Be%7D%2Bf%7Cg%5Ch%5Ei%60j"
        );
        assert_eq!(
            escape_url_for_markdown("https://devdocs.io/python~3.12/library/os#os.path"),
            "https://devdocs.io/python~3.12/library/os#os.path"
        );
    }

    #[test]
    fn test_search_response_lists_hits() {
        let slug = Slug::create("cpp").unwrap();
        let hits = SearchHits::new(vec![SearchHit {
            title: "std::vector::push_back".to_string(),
            url: "https://devdocs.io/cpp/container/vector/push_back".to_string(),
            path: "container/vector/push_back".to_string(),
            kind: "Containers".to_string(),
            slug,
        }]);
        let response = search_response(&hits, "cpp", "push_back");
        assert!(response.text.starts_with("Found 1 results for \"push_back\" in `cpp`"));
        assert!(response.text.contains(
            "1. [std::vector::push_back](https://devdocs.io/cpp/container/vector/push_back) (Containers)"
        ));
    }

    #[test]
    fn test_search_response_empty() {
        let response = search_response(&SearchHits::default(), "cpp", "nothing");
        assert_eq!(response.text, "No results found for \"nothing\" in `cpp`.");
    }

    #[test]
    fn test_available_languages_response_is_json() {
        let collection = DocumentLanguageCollection::from(sample_catalog());
        let response = available_languages_response(&collection);
        let value: serde_json::Value = serde_json::from_str(&response.text).unwrap();
        assert_eq!(value["count"], 4);
        assert_eq!(value["languages"][0]["name"], "python");
        assert_eq!(value["languages"][0]["versions"][0], "3.12");
        assert!(value["slugs"].as_array().unwrap().iter().any(|s| s == "openjdk~8"));
    }

    #[test]
    fn test_language_not_found_lists_names() {
        let response = language_not_found("xyzzy", &["python", "go"]);
        assert!(response.text.contains("\"xyzzy\""));
        assert!(response.text.ends_with("python, go"));
        assert!(!language_not_found("x", &[]).text.contains("include"));
    }
}
