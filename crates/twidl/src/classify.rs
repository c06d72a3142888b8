//! Classification of raw records into typed payloads.
//!
//! Precedence is fixed: `video` (gif or video), then `photos` (photo or
//! album), then plain text. Richer media fields co-occur upstream, so the
//! order matters.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use crate::error::ExtractError;
use crate::payload::{MediaPayload, TweetHeader, VideoPayload, VideoRendition};
use crate::record::{RawPhoto, RawRecord, RawVideo};

/// Classify a decoded record.
///
/// # Errors
/// Returns [`ExtractError::UnexpectedShape`] when a field required by the
/// selected branch is missing.
pub fn classify(record: &RawRecord) -> Result<MediaPayload, ExtractError> {
    let header = build_header(record)?;

    if let Some(video) = &record.video {
        if video.is_gif() {
            return gif(header, video);
        }
        return Ok(MediaPayload::Video {
            header,
            video: video_payload(video)?,
        });
    }

    match record.photos.as_deref() {
        Some([photo]) => Ok(MediaPayload::Photo {
            header,
            photo_url: large(photo.url()?),
        }),
        Some(photos) if photos.len() >= 2 => album(header, photos),
        _ => Ok(MediaPayload::Text { header }),
    }
}

fn build_header(record: &RawRecord) -> Result<TweetHeader, ExtractError> {
    let id = record.id()?;
    let owner_username = record.screen_name()?;
    let text = record.text()?;

    Ok(TweetHeader {
        tweet_text: rewrite_text(text, record.entities.as_ref()),
        tweet_url: format!("https://twitter.com/{owner_username}/status/{id}"),
        created_at: record.created_at.clone(),
        owner_username: owner_username.to_string(),
        owner_name: record.owner_name()?.to_string(),
    })
}

fn gif(header: TweetHeader, video: &RawVideo) -> Result<MediaPayload, ExtractError> {
    let first = video
        .variants()?
        .first()
        .ok_or_else(|| ExtractError::missing("video.variants[0]"))?;

    Ok(MediaPayload::Gif {
        header,
        gif_url: first.src()?.to_string(),
    })
}

fn album(header: TweetHeader, photos: &[RawPhoto]) -> Result<MediaPayload, ExtractError> {
    let photo_urls = photos
        .iter()
        .map(|p| p.url().map(large))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MediaPayload::Album {
        header,
        photo_count: photo_urls.len(),
        photo_urls,
    })
}

/// Drop manifests, label by resolution, sort widest (then tallest) first.
fn video_payload(video: &RawVideo) -> Result<VideoPayload, ExtractError> {
    let poster_url = large(video.poster()?);

    let mut seen = HashSet::new();
    let mut renditions = Vec::new();
    for variant in video.variants()?.iter().filter(|v| !v.is_manifest()) {
        let url = variant.src()?;
        let Some((quality, width, height)) = quality_label(url) else {
            debug!(url, "Skipping video variant without a resolution segment");
            continue;
        };
        if !seen.insert(quality.clone()) {
            continue;
        }
        renditions.push(VideoRendition {
            quality,
            width,
            height,
            url: url.to_string(),
            size: None,
        });
    }

    if renditions.is_empty() {
        return Err(ExtractError::UnexpectedShape(
            "no downloadable video variants".to_string(),
        ));
    }

    renditions.sort_by(|a, b| b.width.cmp(&a.width).then(b.height.cmp(&a.height)));

    Ok(VideoPayload {
        poster_url,
        renditions,
    })
}

/// Read `WIDTHxHEIGHT` from the path segment after `/vid/`.
fn quality_label(url: &str) -> Option<(String, u32, u32)> {
    let after = url.rsplit("/vid/").next()?;
    let label = after.split('/').next()?;
    let (w, h) = label.split_once('x')?;
    Some((label.to_string(), w.parse().ok()?, h.parse().ok()?))
}

/// Request the large size rendition of an image.
fn large(url: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}name=large")
}

#[derive(Debug, Deserialize)]
struct Entities {
    urls: Option<Vec<UrlEntity>>,
    media: Option<Vec<MediaEntity>>,
}

#[derive(Debug, Deserialize)]
struct UrlEntity {
    url: String,
    expanded_url: String,
}

#[derive(Debug, Deserialize)]
struct MediaEntity {
    url: String,
}

/// Expand short links and remove the trailing media link.
///
/// Absent or malformed entity metadata leaves the text unchanged.
#[must_use]
pub fn rewrite_text(text: &str, entities: Option<&Value>) -> String {
    let Some(value) = entities else {
        return text.to_string();
    };
    let Ok(entities) = Entities::deserialize(value) else {
        debug!("Entity metadata has an unexpected shape, leaving text as is");
        return text.to_string();
    };

    let mut rewritten = text.to_string();
    for entity in entities.urls.iter().flatten() {
        rewritten = rewritten.replace(&entity.url, &entity.expanded_url);
    }

    if let Some(media) = entities.media.as_deref().and_then(<[_]>::first) {
        rewritten = rewritten.replace(&format!(" {}", media.url), "");
    }

    rewritten
}
