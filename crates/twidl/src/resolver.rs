//! Link resolution: user text in, post identifier out.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{debug, instrument};

use crate::error::ExtractError;

/// Captures the numeric status ID from `twitter.com/<anything>/status/<digits>`.
static STATUS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"twitter\.com/.*/status/([0-9]+)").unwrap());

/// Captures the authority (host and optional port) of a URL with or without scheme.
static URL_HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:https?://)?([^/?#\s]+)").unwrap());

/// A validated post identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostReference {
    /// Numeric status ID, as digits.
    pub id: String,
    /// URL the ID was captured from (after prefix stripping and expansion).
    pub url: String,
}

impl PostReference {
    /// Extract a post reference from an already-expanded URL.
    ///
    /// # Errors
    /// Returns [`ExtractError::InvalidUrl`] if the URL has no `/status/<digits>` path.
    pub fn parse(url: &str) -> Result<Self, ExtractError> {
        let captures = STATUS_URL.captures(url).ok_or(ExtractError::InvalidUrl)?;
        let id = captures
            .get(1)
            .map(|m| m.as_str().to_string())
            .ok_or(ExtractError::InvalidUrl)?;

        Ok(Self {
            id,
            url: url.to_string(),
        })
    }
}

/// Strip surrounding whitespace and the `www.` prefix.
///
/// # Errors
/// Returns [`ExtractError::EmptyInput`] for empty input.
pub fn normalize(input: &str) -> Result<String, ExtractError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::EmptyInput);
    }
    Ok(trimmed.replace("www.", ""))
}

/// Resolves user input into a [`PostReference`], expanding shortened links.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    client: reqwest::Client,
    shortener_hosts: Vec<String>,
}

impl LinkResolver {
    /// Create a resolver sharing an existing HTTP client.
    #[must_use]
    pub fn new(client: reqwest::Client, shortener_hosts: Vec<String>) -> Self {
        Self {
            client,
            shortener_hosts,
        }
    }

    /// Check whether a URL's host is one of the known shorteners.
    #[must_use]
    pub fn is_shortened(&self, url: &str) -> bool {
        let Some(host) = URL_HOST.captures(url).and_then(|c| c.get(1)) else {
            return false;
        };
        self.shortener_hosts
            .iter()
            .any(|known| known.eq_ignore_ascii_case(host.as_str()))
    }

    /// Resolve user input into a post reference.
    ///
    /// Performs at most one outbound request, only for shortened links.
    ///
    /// # Errors
    /// - [`ExtractError::EmptyInput`] / [`ExtractError::InvalidUrl`] for bad input
    /// - [`ExtractError::Network`] if the shortened link cannot be followed
    #[instrument(skip(self))]
    pub async fn resolve(&self, input: &str) -> Result<PostReference, ExtractError> {
        let mut url = normalize(input)?;

        if self.is_shortened(&url) {
            let response = self.client.get(&url).send().await?;
            let landing = response.url().to_string();
            debug!(from = %url, to = %landing, "Expanded shortened link");
            url = normalize(&landing)?;
        }

        PostReference::parse(&url)
    }
}
