use clap::{Args, ValueEnum};

use crate::devdocs::DEFAULT_BASE_URL;
use crate::fuzzy::DEFAULT_FUZZY_THRESHOLD;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Runtime settings, from command line flags or the environment.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Base URL of the DevDocs instance serving docs.json and the indexes
    #[arg(long, env = "DEVDOCS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Base URL used for links in search results (defaults to the base URL)
    #[arg(long, env = "DEVDOCS_DOCS_URL")]
    pub docs_url: Option<String>,

    /// Fuzzy matching threshold between 0 (exact) and 1 (anything)
    #[arg(long, env = "DEVDOCS_FUZZY_THRESHOLD", default_value_t = DEFAULT_FUZZY_THRESHOLD)]
    pub fuzzy_threshold: f64,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn docs_url(&self) -> &str {
        self.docs_url.as_deref().unwrap_or(&self.base_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            docs_url: None,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["devdocs-mcp"]);
        assert_eq!(cli.config.docs_url(), cli.config.base_url);
        assert_eq!(cli.config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_flags_override() {
        let cli = TestCli::parse_from([
            "devdocs-mcp",
            "--base-url",
            "http://devdocs:9292",
            "--docs-url",
            "http://localhost:9292",
            "--fuzzy-threshold",
            "0.3",
            "--log-format",
            "json",
        ]);
        assert_eq!(cli.config.base_url, "http://devdocs:9292");
        assert_eq!(cli.config.docs_url(), "http://localhost:9292");
        assert_eq!(cli.config.fuzzy_threshold, 0.3);
        assert_eq!(cli.config.log_format, LogFormat::Json);
    }
}
