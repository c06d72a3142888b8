//! Classified tweet payloads handed to the delivery layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::size::ContentSize;

/// Fields shared by every payload variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TweetHeader {
    /// Display text with short links expanded and the media link removed.
    pub tweet_text: String,
    /// `https://twitter.com/<screen_name>/status/<id>`
    pub tweet_url: String,
    /// Creation timestamp as sent upstream (UTC).
    pub created_at: Option<String>,
    pub owner_username: String,
    pub owner_name: String,
}

impl TweetHeader {
    /// Parse `created_at` as an RFC 3339 timestamp.
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// One directly downloadable video rendition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRendition {
    /// Resolution label taken from the URL, e.g. `1280x720`.
    pub quality: String,
    pub width: u32,
    pub height: u32,
    pub url: String,
    /// Filled by [`crate::Extractor::measure_video`].
    pub size: Option<ContentSize>,
}

/// Video payload body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoPayload {
    pub poster_url: String,
    /// Sorted by width, widest first.
    pub renditions: Vec<VideoRendition>,
}

impl VideoPayload {
    /// Highest quality rendition.
    #[must_use]
    pub fn best(&self) -> Option<&VideoRendition> {
        self.renditions.first()
    }
}

/// A tweet classified by media kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type_name", rename_all = "snake_case")]
pub enum MediaPayload {
    Text {
        #[serde(flatten)]
        header: TweetHeader,
    },
    Gif {
        #[serde(flatten)]
        header: TweetHeader,
        gif_url: String,
    },
    Photo {
        #[serde(flatten)]
        header: TweetHeader,
        photo_url: String,
    },
    Album {
        #[serde(flatten)]
        header: TweetHeader,
        photo_urls: Vec<String>,
        photo_count: usize,
    },
    Video {
        #[serde(flatten)]
        header: TweetHeader,
        #[serde(flatten)]
        video: VideoPayload,
    },
}

impl MediaPayload {
    #[must_use]
    pub const fn header(&self) -> &TweetHeader {
        match self {
            Self::Text { header }
            | Self::Gif { header, .. }
            | Self::Photo { header, .. }
            | Self::Album { header, .. }
            | Self::Video { header, .. } => header,
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Gif { .. } => "gif",
            Self::Photo { .. } => "photo",
            Self::Album { .. } => "album",
            Self::Video { .. } => "video",
        }
    }
}
