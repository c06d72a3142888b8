//! Tweet extraction for chat bots.
//!
//! Turns a user-supplied tweet link into a typed [`MediaPayload`]: short links
//! are expanded, the status ID is extracted, the public syndication endpoint is
//! queried and the response is classified as text, gif, photo, album or video.
//!
//! # Usage
//!
//! ```no_run
//! use twidl::{Extractor, MediaPayload};
//!
//! # async fn example() -> Result<(), twidl::ExtractError> {
//! let extractor = Extractor::from_env()?;
//! match extractor.fetch_and_classify("https://twitter.com/i/status/1481722124855169028").await {
//!     Ok(MediaPayload::Video { video, .. }) => println!("{} renditions", video.renditions.len()),
//!     Ok(other) => println!("{}", other.type_name()),
//!     Err(e) => println!("{}: {e}", e.kind().as_str()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! [`ExtractorConfig::default`] reads:
//!
//! - `TWIDL_SYNDICATION_URL`: syndication endpoint
//! - `TWIDL_LANG`: language parameter (default `en`)
//! - `TWIDL_USER_AGENT`: browser-like user agent
//! - `TWIDL_TIMEOUT_SECS`: per-request timeout (default 15)
//! - `TWIDL_SHORTENER_HOSTS`: comma-separated shortener hosts (default `t.co`)
//!
//! # Architecture
//!
//! - [`LinkResolver`] normalizes input and expands shortened links
//! - [`Extractor`] fetches the syndication record and runs [`classify`]
//! - [`delivery::dispatch`] maps an [`Outcome`] onto a [`DeliveryChannel`]

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod classify;
pub mod config;
pub mod delivery;
pub mod error;
pub mod extractor;
pub mod payload;
pub mod record;
pub mod resolver;
pub mod size;

pub use classify::{classify, rewrite_text};
pub use config::ExtractorConfig;
pub use delivery::{dispatch, DeliveryChannel, FailureNotice, VideoDelivery};
pub use error::{DeliveryError, ExtractError, FailureKind, Outcome};
pub use extractor::Extractor;
pub use payload::{MediaPayload, TweetHeader, VideoPayload, VideoRendition};
pub use resolver::{LinkResolver, PostReference};
pub use size::{human_readable_filesize, ContentSize, INLINE_UPLOAD_LIMIT};

/// Resolve and classify a link with an environment-configured [`Extractor`].
///
/// Hosts handling many requests should build one [`Extractor`] and reuse it.
pub async fn fetch_and_classify(url: &str) -> Outcome {
    Extractor::from_env()?.fetch_and_classify(url).await
}
