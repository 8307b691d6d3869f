//! # Crawler Configuration Module
//!
//! Environment variable-based configuration for the decorator-chain crawler.
//!
//! ## Environment Variables
//!
//! ### `DCRAWL_DEFAULTS_KEY`
//!
//! The reserved top-level fragment key holding method-agnostic defaults.
//!
//! Default: `_`
//!
//! ### `DCRAWL_STRICT_FRAGMENTS`
//!
//! When `true` (or `1`), a docstring whose YAML section does not parse as a
//! mapping aborts the crawl with [`crate::CrawlError::MalformedFragment`]
//! instead of being skipped.
//!
//! Default: `false`
//!
//! ## Usage
//!
//! ```rust
//! use decorated_crawler::config::CrawlerConfig;
//!
//! let config = CrawlerConfig::from_env();
//! println!("Global defaults live under '{}'", config.defaults_key);
//! ```

use std::env;

/// Reserved key for method-agnostic defaults when nothing else is configured.
pub const DEFAULT_DEFAULTS_KEY: &str = "_";

/// Crawler configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlerConfig {
    /// Top-level fragment key carrying global defaults (default: `_`)
    pub defaults_key: String,
    /// Fail on malformed fragments instead of skipping them (default: false)
    pub strict_fragments: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        CrawlerConfig {
            defaults_key: DEFAULT_DEFAULTS_KEY.to_string(),
            strict_fragments: false,
        }
    }
}

impl CrawlerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults_key = match env::var("DCRAWL_DEFAULTS_KEY") {
            Ok(val) if !val.trim().is_empty() => val.trim().to_string(),
            _ => DEFAULT_DEFAULTS_KEY.to_string(),
        };
        let strict_fragments = env::var("DCRAWL_STRICT_FRAGMENTS")
            .ok()
            .map(|val| parse_flag(&val))
            .unwrap_or(false);
        CrawlerConfig {
            defaults_key,
            strict_fragments,
        }
    }

    /// Builder-style toggle for strict fragment parsing
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_fragments = strict;
        self
    }
}

pub(crate) fn parse_flag(val: &str) -> bool {
    matches!(
        val.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CrawlerConfig::default();
        assert_eq!(config.defaults_key, "_");
        assert!(!config.strict_fragments);
        assert!(config.strict(true).strict_fragments);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("on"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }
}
