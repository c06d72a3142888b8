//! Syndication response record.
//!
//! Every field is optional: the endpoint omits whatever a given tweet does not
//! carry, so presence checks drive classification and accessors report the
//! exact path when a field the chosen branch requires is absent.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ExtractError;

/// Streaming playlist container type, not directly downloadable.
pub const MANIFEST_CONTENT_TYPE: &str = "application/x-mpegURL";

/// Raw tweet as returned by the syndication endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    pub id_str: Option<String>,
    pub created_at: Option<String>,
    pub text: Option<String>,
    pub user: Option<RawUser>,
    /// Kept untyped: malformed entity metadata must not fail the decode.
    pub entities: Option<Value>,
    pub video: Option<RawVideo>,
    pub photos: Option<Vec<RawPhoto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    pub screen_name: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVideo {
    #[serde(rename = "contentType")]
    pub content_type: Option<String>,
    pub poster: Option<String>,
    pub variants: Option<Vec<RawVideoVariant>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVideoVariant {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPhoto {
    pub url: Option<String>,
}

impl RawRecord {
    pub fn id(&self) -> Result<&str, ExtractError> {
        self.id_str
            .as_deref()
            .ok_or_else(|| ExtractError::missing("id_str"))
    }

    pub fn text(&self) -> Result<&str, ExtractError> {
        self.text.as_deref().ok_or_else(|| ExtractError::missing("text"))
    }

    pub fn screen_name(&self) -> Result<&str, ExtractError> {
        self.user
            .as_ref()
            .and_then(|u| u.screen_name.as_deref())
            .ok_or_else(|| ExtractError::missing("user.screen_name"))
    }

    pub fn owner_name(&self) -> Result<&str, ExtractError> {
        self.user
            .as_ref()
            .and_then(|u| u.name.as_deref())
            .ok_or_else(|| ExtractError::missing("user.name"))
    }
}

impl RawVideo {
    /// Animated GIFs are served through the video field with this content type.
    #[must_use]
    pub fn is_gif(&self) -> bool {
        self.content_type.as_deref() == Some("gif")
    }

    pub fn poster(&self) -> Result<&str, ExtractError> {
        self.poster
            .as_deref()
            .ok_or_else(|| ExtractError::missing("video.poster"))
    }

    pub fn variants(&self) -> Result<&[RawVideoVariant], ExtractError> {
        self.variants
            .as_deref()
            .ok_or_else(|| ExtractError::missing("video.variants"))
    }
}

impl RawVideoVariant {
    #[must_use]
    pub fn is_manifest(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case(MANIFEST_CONTENT_TYPE))
    }

    pub fn src(&self) -> Result<&str, ExtractError> {
        self.src
            .as_deref()
            .ok_or_else(|| ExtractError::missing("video.variants[].src"))
    }
}

impl RawPhoto {
    pub fn url(&self) -> Result<&str, ExtractError> {
        self.url
            .as_deref()
            .ok_or_else(|| ExtractError::missing("photos[].url"))
    }
}
