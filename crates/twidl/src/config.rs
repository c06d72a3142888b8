//! Configuration for the extractor.

use std::env;
use std::time::Duration;

/// Public syndication endpoint serving tweet JSON without authentication.
pub const DEFAULT_SYNDICATION_URL: &str = "https://cdn.syndication.twimg.com/tweet";

/// The syndication endpoint rejects default library agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/98.0.4758.80 Safari/537.36";

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Extractor configuration.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Syndication endpoint queried with `?id=<digits>&lang=<lang>`.
    pub syndication_url: String,
    /// Language parameter sent with every syndication request.
    pub lang: String,
    /// Browser-like user agent sent with syndication requests.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Hosts (with port, if any) whose links must be expanded first.
    pub shortener_hosts: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            syndication_url: non_empty(env::var("TWIDL_SYNDICATION_URL"))
                .unwrap_or_else(|| DEFAULT_SYNDICATION_URL.to_string()),
            lang: non_empty(env::var("TWIDL_LANG"))
                .unwrap_or_else(|| "en".to_string()),
            user_agent: non_empty(env::var("TWIDL_USER_AGENT"))
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: Duration::from_secs(
                env::var("TWIDL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            shortener_hosts: env::var("TWIDL_SHORTENER_HOSTS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|h| h.trim().to_string())
                        .filter(|h| !h.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| vec!["t.co".to_string()]),
        }
    }
}

/// Treat unset and empty variables alike.
fn non_empty(value: Result<String, env::VarError>) -> Option<String> {
    value.ok().filter(|s| !s.trim().is_empty())
}

impl ExtractorConfig {
    /// Point the extractor at a different syndication endpoint.
    #[must_use]
    pub fn with_syndication_url(mut self, url: impl Into<String>) -> Self {
        self.syndication_url = url.into();
        self
    }

    /// Replace the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the list of shortener hosts.
    #[must_use]
    pub fn with_shortener_hosts(mut self, hosts: Vec<String>) -> Self {
        self.shortener_hosts = hosts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_override_defaults() {
        let config = ExtractorConfig::default()
            .with_syndication_url("http://localhost:9999/tweet")
            .with_timeout(Duration::from_secs(2))
            .with_shortener_hosts(vec!["short.example".to_string()]);

        assert_eq!(config.syndication_url, "http://localhost:9999/tweet");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.shortener_hosts, vec!["short.example".to_string()]);
    }

    #[test]
    fn test_empty_variables_fall_back() {
        assert_eq!(non_empty(Ok(String::new())), None);
        assert_eq!(non_empty(Ok("  ".to_string())), None);
        assert_eq!(non_empty(Err(env::VarError::NotPresent)), None);
        assert_eq!(non_empty(Ok("de".to_string())), Some("de".to_string()));
        assert_eq!(
            non_empty(Ok(String::new())).unwrap_or_else(|| "en".to_string()),
            "en"
        );
    }

    #[test]
    fn test_default_timeout_is_bounded() {
        let config = ExtractorConfig::default();
        assert!(config.timeout > Duration::ZERO);
    }
}
