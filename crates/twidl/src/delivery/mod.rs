//! Delivery contract for chat transports.
//!
//! The transport itself (message send/edit, keyboards, uploads) lives in the
//! host. This module maps an [`Outcome`] onto exactly one
//! [`DeliveryChannel`] call and decides how a video should be delivered.

pub mod render;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error};

use crate::error::{DeliveryError, Outcome};
use crate::payload::{MediaPayload, TweetHeader, VideoPayload};

pub use render::{caption, escape_html, FailureNotice};

/// How the best video rendition should reach the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VideoDelivery {
    /// Small enough for the transport to upload.
    Inline { url: String },
    /// Too large or of unknown size; send a direct link instead.
    Link { url: String, size: String },
}

/// Pick a delivery mode from the best rendition's measured size.
///
/// Returns `None` when the payload has no renditions.
#[must_use]
pub fn plan_video(video: &VideoPayload) -> Option<VideoDelivery> {
    let best = video.best()?;
    let plan = match &best.size {
        Some(size) if size.fits_inline() => VideoDelivery::Inline {
            url: best.url.clone(),
        },
        Some(size) => VideoDelivery::Link {
            url: best.url.clone(),
            size: size.human.clone(),
        },
        None => VideoDelivery::Link {
            url: best.url.clone(),
            size: "unknown".to_string(),
        },
    };
    Some(plan)
}

/// `(label, url)` pairs for a quality selection keyboard, best first.
#[must_use]
pub fn quality_options(video: &VideoPayload) -> Vec<(String, String)> {
    video
        .renditions
        .iter()
        .map(|r| (r.quality.clone(), r.url.clone()))
        .collect()
}

/// A chat transport able to render each payload variant.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    async fn send_text(&self, header: &TweetHeader) -> Result<(), DeliveryError>;

    async fn send_gif(&self, header: &TweetHeader, gif_url: &str) -> Result<(), DeliveryError>;

    async fn send_photo(&self, header: &TweetHeader, photo_url: &str)
        -> Result<(), DeliveryError>;

    async fn send_album(
        &self,
        header: &TweetHeader,
        photo_urls: &[String],
    ) -> Result<(), DeliveryError>;

    async fn send_video(
        &self,
        header: &TweetHeader,
        video: &VideoPayload,
        plan: &VideoDelivery,
    ) -> Result<(), DeliveryError>;

    /// Show a failure message to the user.
    async fn send_failure(&self, notice: &FailureNotice) -> Result<(), DeliveryError>;
}

/// Route an outcome to the matching channel operation.
///
/// Every failure category becomes a [`FailureNotice`]; only transport errors
/// are returned.
///
/// # Errors
/// Returns whatever the channel's send operation returns.
pub async fn dispatch(outcome: &Outcome, channel: &dyn DeliveryChannel) -> Result<(), DeliveryError> {
    let payload = match outcome {
        Ok(payload) => payload,
        Err(e) => {
            debug!(channel = channel.name(), kind = e.kind().as_str(), "Sending failure notice");
            return channel.send_failure(&FailureNotice::from_error(e)).await;
        }
    };

    debug!(
        channel = channel.name(),
        type_name = payload.type_name(),
        "Delivering payload"
    );

    let result = match payload {
        MediaPayload::Text { header } => channel.send_text(header).await,
        MediaPayload::Gif { header, gif_url } => channel.send_gif(header, gif_url).await,
        MediaPayload::Photo { header, photo_url } => channel.send_photo(header, photo_url).await,
        MediaPayload::Album {
            header, photo_urls, ..
        } => channel.send_album(header, photo_urls).await,
        MediaPayload::Video { header, video } => match plan_video(video) {
            Some(plan) => channel.send_video(header, video, &plan).await,
            None => channel.send_text(header).await,
        },
    };

    if let Err(e) = &result {
        error!(channel = channel.name(), error = %e, "Delivery failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use crate::payload::VideoRendition;
    use crate::size::{ContentSize, INLINE_UPLOAD_LIMIT};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingChannel {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingChannel {
        fn record(&self, call: String) -> Result<(), DeliveryError> {
            self.calls.lock().unwrap().push(call);
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DeliveryChannel for RecordingChannel {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send_text(&self, header: &TweetHeader) -> Result<(), DeliveryError> {
            self.record(format!("text:{}", header.tweet_text))
        }

        async fn send_gif(&self, _: &TweetHeader, gif_url: &str) -> Result<(), DeliveryError> {
            self.record(format!("gif:{gif_url}"))
        }

        async fn send_photo(&self, _: &TweetHeader, photo_url: &str) -> Result<(), DeliveryError> {
            self.record(format!("photo:{photo_url}"))
        }

        async fn send_album(&self, _: &TweetHeader, urls: &[String]) -> Result<(), DeliveryError> {
            self.record(format!("album:{}", urls.len()))
        }

        async fn send_video(
            &self,
            _: &TweetHeader,
            _: &VideoPayload,
            plan: &VideoDelivery,
        ) -> Result<(), DeliveryError> {
            self.record(format!("video:{plan:?}"))
        }

        async fn send_failure(&self, notice: &FailureNotice) -> Result<(), DeliveryError> {
            self.record(format!("failure:{}", notice.kind.as_str()))
        }
    }

    fn header() -> TweetHeader {
        TweetHeader {
            tweet_text: "hello".to_string(),
            tweet_url: "https://twitter.com/a/status/1".to_string(),
            created_at: None,
            owner_username: "a".to_string(),
            owner_name: "A".to_string(),
        }
    }

    fn video(size: Option<u64>) -> VideoPayload {
        VideoPayload {
            poster_url: "https://pbs/p.jpg?name=large".to_string(),
            renditions: vec![
                VideoRendition {
                    quality: "1280x720".to_string(),
                    width: 1280,
                    height: 720,
                    url: "https://video/720.mp4".to_string(),
                    size: size.map(ContentSize::new),
                },
                VideoRendition {
                    quality: "640x360".to_string(),
                    width: 640,
                    height: 360,
                    url: "https://video/360.mp4".to_string(),
                    size: None,
                },
            ],
        }
    }

    #[test]
    fn test_plan_video_by_size() {
        assert_eq!(
            plan_video(&video(Some(1024))),
            Some(VideoDelivery::Inline {
                url: "https://video/720.mp4".to_string()
            })
        );
        assert_eq!(
            plan_video(&video(Some(INLINE_UPLOAD_LIMIT))),
            Some(VideoDelivery::Link {
                url: "https://video/720.mp4".to_string(),
                size: "20.0MiB".to_string(),
            })
        );
        assert!(matches!(
            plan_video(&video(None)),
            Some(VideoDelivery::Link { ref size, .. }) if size == "unknown"
        ));

        let empty = VideoPayload {
            poster_url: String::new(),
            renditions: vec![],
        };
        assert_eq!(plan_video(&empty), None);
    }

    #[test]
    fn test_quality_options_order() {
        let options = quality_options(&video(None));
        assert_eq!(options[0].0, "1280x720");
        assert_eq!(options[1].1, "https://video/360.mp4");
    }

    #[tokio::test]
    async fn test_dispatch_routes_variants() {
        let channel = RecordingChannel::default();

        let outcomes: Vec<Outcome> = vec![
            Ok(MediaPayload::Text { header: header() }),
            Ok(MediaPayload::Gif {
                header: header(),
                gif_url: "https://g.mp4".to_string(),
            }),
            Ok(MediaPayload::Photo {
                header: header(),
                photo_url: "https://p.jpg".to_string(),
            }),
            Ok(MediaPayload::Album {
                header: header(),
                photo_urls: vec!["1".to_string(), "2".to_string()],
                photo_count: 2,
            }),
            Ok(MediaPayload::Video {
                header: header(),
                video: video(Some(10)),
            }),
            Err(ExtractError::NotFound),
            Err(ExtractError::InvalidUrl),
            Err(ExtractError::UnexpectedShape("x".to_string())),
        ];

        for outcome in &outcomes {
            dispatch(outcome, &channel).await.unwrap();
        }

        assert_eq!(
            channel.calls(),
            vec![
                "text:hello".to_string(),
                "gif:https://g.mp4".to_string(),
                "photo:https://p.jpg".to_string(),
                "album:2".to_string(),
                "video:Inline { url: \"https://video/720.mp4\" }".to_string(),
                "failure:not_found".to_string(),
                "failure:invalid_url".to_string(),
                "failure:upstream_error".to_string(),
            ]
        );
    }
}
