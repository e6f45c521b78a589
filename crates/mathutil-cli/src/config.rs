//! CLI configuration via environment variables
//!
//! Runner settings live in `mathutil.toml` (see `mathutil_harness::config`).
//! Output and logging preferences come from the environment.

use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Default to JSON test output (MATHUTIL_JSON=1)
    pub default_json: bool,
    /// Disable colored output (MATHUTIL_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Tracing filter directives (MATHUTIL_LOG=debug, MATHUTIL_LOG=mathutil_harness=trace)
    pub log_filter: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            default_json: lookup("MATHUTIL_JSON")
                .map(|v| {
                    let lower = v.to_lowercase();
                    lower == "1" || lower == "true" || lower == "json"
                })
                .unwrap_or(false),
            no_color: lookup("MATHUTIL_NO_COLOR").is_some() || lookup("NO_COLOR").is_some(),
            log_filter: lookup("MATHUTIL_LOG").filter(|v| !v.trim().is_empty()),
        }
    }
}
