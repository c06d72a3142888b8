//! File size formatting and the inline-upload threshold.

use serde::Serialize;

/// Largest file a chat transport will accept as an inline upload (20 MiB).
pub const INLINE_UPLOAD_LIMIT: u64 = 20 * 1024 * 1024;

const UNITS: [&str; 8] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];

/// Format a byte count with binary prefixes and one decimal place.
///
/// ```
/// assert_eq!(twidl::human_readable_filesize(1536), "1.5KiB");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn human_readable_filesize(bytes: u64) -> String {
    let mut num = bytes as f64;
    for unit in UNITS {
        if num.abs() < 1024.0 {
            return format!("{num:.1}{unit}B");
        }
        num /= 1024.0;
    }
    format!("{num:.1}YiB")
}

/// Byte size of a downloadable file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentSize {
    pub bytes: u64,
    pub human: String,
}

impl ContentSize {
    #[must_use]
    pub fn new(bytes: u64) -> Self {
        Self {
            bytes,
            human: human_readable_filesize(bytes),
        }
    }

    /// Whether the transport may upload this file inline.
    #[must_use]
    pub const fn fits_inline(&self) -> bool {
        self.bytes < INLINE_UPLOAD_LIMIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_readable_filesize() {
        assert_eq!(human_readable_filesize(0), "0.0B");
        assert_eq!(human_readable_filesize(1023), "1023.0B");
        assert_eq!(human_readable_filesize(1536), "1.5KiB");
        assert_eq!(human_readable_filesize(20_971_520), "20.0MiB");
        assert_eq!(human_readable_filesize(5 * 1024 * 1024 * 1024), "5.0GiB");
    }

    #[test]
    fn test_human_readable_filesize_largest() {
        assert_eq!(human_readable_filesize(u64::MAX), "16.0EiB");
    }

    #[test]
    fn test_inline_threshold() {
        assert!(ContentSize::new(INLINE_UPLOAD_LIMIT - 1).fits_inline());
        assert!(!ContentSize::new(INLINE_UPLOAD_LIMIT).fits_inline());
        assert_eq!(ContentSize::new(INLINE_UPLOAD_LIMIT).human, "20.0MiB");
    }
}
