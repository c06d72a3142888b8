//! HTML rendering for chat messages.

use serde::Serialize;

use crate::error::{ExtractError, FailureKind};
use crate::payload::TweetHeader;

/// Link users are shown as an example of valid input.
pub const SAMPLE_LINK: &str = "https://twitter.com/i/status/1481722124855169028";

const ERROR_ANIMATION: &str = "https://media.giphy.com/media/sS8YbjrTzu4KI/giphy.gif";
const NOT_FOUND_ANIMATION: &str = "https://media.giphy.com/media/6uGhT1O4sxpi8/giphy.gif";

/// Escape text for HTML parse mode.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Caption shared by every payload: tweet text, then author and post link.
#[must_use]
pub fn caption(header: &TweetHeader) -> String {
    let mut out = String::new();
    if !header.tweet_text.is_empty() {
        out.push_str(&escape_html(&header.tweet_text));
        out.push_str("\n\n");
    }
    out.push_str(&format!(
        "<a href=\"{url}\">{name} (@{username})</a>",
        url = escape_html(&header.tweet_url),
        name = escape_html(&header.owner_name),
        username = escape_html(&header.owner_username),
    ));
    if let Some(created) = header.created_at_utc() {
        out.push_str(&format!("\n{}", created.format("%Y-%m-%d %H:%M UTC")));
    }
    out
}

/// User-facing rendering of a failed extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureNotice {
    pub kind: FailureKind,
    pub status_code: Option<u16>,
    /// HTML message ready to send.
    pub text: String,
}

impl FailureNotice {
    #[must_use]
    pub fn from_error(error: &ExtractError) -> Self {
        let kind = error.kind();
        let text = match kind {
            FailureKind::InvalidUrl => {
                format!("Please enter Tweet URL. Sample:\n{SAMPLE_LINK}")
            }
            FailureKind::NotFound => format!(
                "<a href=\"{NOT_FOUND_ANIMATION}\">&#160;</a>{}",
                escape_html(&error.to_string())
            ),
            FailureKind::UpstreamError => format!(
                "🤦 There's something wrong ...\n\nPlease try again later<a href=\"{ERROR_ANIMATION}\">&#160;</a>"
            ),
        };

        Self {
            kind,
            status_code: error.status_code(),
            text,
        }
    }
}
