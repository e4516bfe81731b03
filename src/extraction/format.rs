use serde::{Deserialize, Serialize};

/// Which extraction path a declared media type routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionStrategy {
    /// The format stores text natively (PDF text layer).
    NativeText,
    /// Raster image; text must be recognized optically.
    Optical,
    /// Nothing we can extract from.
    Unsupported,
}

impl ExtractionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NativeText => "native_text",
            Self::Optical => "optical",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Route a declared media type to an extraction strategy.
///
/// `application/pdf` → native text layer; `image/*` → OCR; anything else is
/// unsupported. Comparison ignores ASCII case and surrounding whitespace,
/// since clients are sloppy about both.
pub fn classify_media_type(media_type: &str) -> ExtractionStrategy {
    let media_type = media_type.trim();

    if media_type.eq_ignore_ascii_case("application/pdf") {
        ExtractionStrategy::NativeText
    } else if media_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
    {
        ExtractionStrategy::Optical
    } else {
        ExtractionStrategy::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_table() {
        let cases = [
            ("application/pdf", ExtractionStrategy::NativeText),
            ("APPLICATION/PDF", ExtractionStrategy::NativeText),
            ("  application/pdf  ", ExtractionStrategy::NativeText),
            ("image/jpeg", ExtractionStrategy::Optical),
            ("image/png", ExtractionStrategy::Optical),
            ("image/tiff", ExtractionStrategy::Optical),
            ("image/heic", ExtractionStrategy::Optical),
            ("IMAGE/PNG", ExtractionStrategy::Optical),
            ("text/csv", ExtractionStrategy::Unsupported),
            ("text/plain", ExtractionStrategy::Unsupported),
            ("application/msword", ExtractionStrategy::Unsupported),
            ("application/pdf+xml", ExtractionStrategy::Unsupported),
            ("application/octet-stream", ExtractionStrategy::Unsupported),
            ("image", ExtractionStrategy::Unsupported),
            ("", ExtractionStrategy::Unsupported),
            // Multibyte characters around the prefix boundary must classify,
            // not panic.
            ("abcdeü", ExtractionStrategy::Unsupported),
            ("imagé/png", ExtractionStrategy::Unsupported),
            ("画像/png", ExtractionStrategy::Unsupported),
        ];

        for (media_type, expected) in cases {
            assert_eq!(
                classify_media_type(media_type),
                expected,
                "media type {media_type:?}"
            );
        }
    }

    #[test]
    fn strategy_as_str() {
        assert_eq!(ExtractionStrategy::NativeText.as_str(), "native_text");
        assert_eq!(ExtractionStrategy::Optical.as_str(), "optical");
        assert_eq!(ExtractionStrategy::Unsupported.as_str(), "unsupported");
    }
}
