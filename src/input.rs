use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::values::{Language, Version};

// Tried in order: "openjdk~21", "java 17", "vue v3".
static VERSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"~(\d+(?:\.\d+)*)", r"\b(\d+(?:\.\d+)*)\b", r"(?i)v(\d+(?:\.\d+)*)"]
        .iter()
        .map(|p| Regex::new(p).expect("version pattern is valid"))
        .collect()
});

/// A language hint split from the version it may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageVersionInput {
    language: Language,
    version: Option<Version>,
}

impl LanguageVersionInput {
    /// Lowercases the language and pulls a version out of it unless one is
    /// given explicitly.
    pub fn create(language: &str, version: Option<&str>) -> Result<Self, ValidationError> {
        let clean = language.trim().to_lowercase();

        if let Some(version) = version.filter(|v| !v.trim().is_empty()) {
            return Ok(Self {
                language: Language::new(&clean)?,
                version: Some(Version::new(version)?),
            });
        }

        for pattern in VERSION_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(&clean) {
                let without_version = pattern.replace(&clean, "");
                return Ok(Self {
                    language: Language::new(&without_version)?,
                    version: Some(Version::new(&caps[1])?),
                });
            }
        }

        Ok(Self {
            language: Language::new(&clean)?,
            version: None,
        })
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(language: &str, version: Option<&str>) -> (String, Option<String>) {
        let input = LanguageVersionInput::create(language, version).unwrap();
        (
            input.language().to_string(),
            input.version().map(|v| v.to_string()),
        )
    }

    #[test]
    fn test_plain_language() {
        assert_eq!(split("  Python ", None), ("python".into(), None));
    }

    #[test]
    fn test_version_in_language_text() {
        assert_eq!(split("Python 3.12", None), ("python".into(), Some("3.12".into())));
        assert_eq!(split("Java 17", None), ("java".into(), Some("17".into())));
    }

    #[test]
    fn test_tilde_version() {
        assert_eq!(split("openjdk~21", None), ("openjdk".into(), Some("21".into())));
    }

    #[test]
    fn test_v_prefixed_version() {
        assert_eq!(split("Vue v3", None), ("vue".into(), Some("3".into())));
    }

    #[test]
    fn test_explicit_version_wins() {
        assert_eq!(
            split("python 3.9", Some(" 3.12 ")),
            ("python 3.9".into(), Some("3.12".into()))
        );
        assert_eq!(split("rust", Some("  ")), ("rust".into(), None));
    }

    #[test]
    fn test_version_only_input_is_rejected() {
        assert!(LanguageVersionInput::create("3.12", None).is_err());
        assert!(LanguageVersionInput::create("", None).is_err());
    }
}
