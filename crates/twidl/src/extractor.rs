//! Syndication client: fetches a tweet and classifies it.

use reqwest::header::{HeaderValue, CONTENT_LENGTH, USER_AGENT};
use reqwest::StatusCode;
use tracing::{debug, info, instrument, warn};

use crate::classify::classify;
use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Outcome};
use crate::payload::{MediaPayload, VideoPayload};
use crate::record::RawRecord;
use crate::resolver::{LinkResolver, PostReference};
use crate::size::ContentSize;

/// Resolves tweet links and turns them into [`MediaPayload`]s.
///
/// Holds no per-request state; clone it freely or share it across tasks.
#[derive(Debug, Clone)]
pub struct Extractor {
    client: reqwest::Client,
    resolver: LinkResolver,
    user_agent: HeaderValue,
    config: ExtractorConfig,
}

impl Extractor {
    /// Create an extractor from configuration.
    ///
    /// # Errors
    /// Returns [`ExtractError::Client`] if the user agent is not a valid
    /// header value or the HTTP client cannot be built.
    ///
    /// The user agent is sent only with syndication requests.
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractError> {
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ExtractError::Client(format!("invalid user agent: {e}")))?;

        // Short-link expansion must go out without the browser user agent.
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExtractError::Client(e.to_string()))?;

        let resolver = LinkResolver::new(client.clone(), config.shortener_hosts.clone());

        Ok(Self {
            client,
            resolver,
            user_agent,
            config,
        })
    }

    /// Create an extractor configured from environment variables.
    ///
    /// # Errors
    /// See [`Extractor::new`].
    pub fn from_env() -> Result<Self, ExtractError> {
        Self::new(ExtractorConfig::default())
    }

    #[must_use]
    pub const fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    #[must_use]
    pub const fn resolver(&self) -> &LinkResolver {
        &self.resolver
    }

    /// Resolve user input and classify the tweet it points to.
    ///
    /// At most two sequential requests: the optional short-link expansion
    /// and the syndication fetch.
    #[instrument(skip(self))]
    pub async fn fetch_and_classify(&self, input: &str) -> Outcome {
        let reference = self.resolver.resolve(input).await?;
        self.classify_reference(&reference).await
    }

    /// Fetch and classify an already resolved post.
    pub async fn classify_reference(&self, reference: &PostReference) -> Outcome {
        let record = self.fetch_record(reference).await?;
        let payload = classify(&record)?;
        info!(
            tweet_id = %reference.id,
            type_name = payload.type_name(),
            "Classified tweet"
        );
        Ok(payload)
    }

    /// Like [`Extractor::fetch_and_classify`], then measure video renditions.
    pub async fn extract(&self, input: &str) -> Outcome {
        let payload = self.fetch_and_classify(input).await?;
        Ok(self.measure(payload).await)
    }

    /// Fetch the raw syndication record for a post.
    ///
    /// # Errors
    /// - [`ExtractError::NotFound`] on 404
    /// - [`ExtractError::Upstream`] on any other non-200 status
    /// - [`ExtractError::Network`] if the request fails
    /// - [`ExtractError::UnexpectedShape`] if the body is not a tweet record
    #[instrument(skip(self), fields(tweet_id = %reference.id))]
    pub async fn fetch_record(&self, reference: &PostReference) -> Result<RawRecord, ExtractError> {
        let response = self
            .client
            .get(&self.config.syndication_url)
            .header(USER_AGENT, self.user_agent.clone())
            .query(&[("id", reference.id.as_str()), ("lang", self.config.lang.as_str())])
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                debug!("Syndication endpoint returned 404");
                return Err(ExtractError::NotFound);
            }
            _ => {
                warn!(status = %status, "Syndication request failed");
                return Err(ExtractError::Upstream {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                });
            }
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ExtractError::UnexpectedShape(e.to_string()))
    }

    /// Read a file's size with a `HEAD` request.
    ///
    /// # Errors
    /// Fails on network errors, non-success status, or a missing `Content-Length`.
    #[instrument(skip(self))]
    pub async fn probe_size(&self, url: &str) -> Result<ContentSize, ExtractError> {
        let response = self.client.head(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Upstream {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let bytes = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| ExtractError::missing("Content-Length"))?;

        Ok(ContentSize::new(bytes))
    }

    /// Fill in the size of every rendition; failed probes stay unknown.
    pub async fn measure_video(&self, video: &VideoPayload) -> VideoPayload {
        let mut measured = video.clone();
        for rendition in &mut measured.renditions {
            match self.probe_size(&rendition.url).await {
                Ok(size) => rendition.size = Some(size),
                Err(e) => {
                    warn!(url = %rendition.url, error = %e, "Could not measure video rendition");
                }
            }
        }
        measured
    }

    async fn measure(&self, payload: MediaPayload) -> MediaPayload {
        match payload {
            MediaPayload::Video { header, video } => MediaPayload::Video {
                video: self.measure_video(&video).await,
                header,
            },
            other => other,
        }
    }
}
