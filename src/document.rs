use std::fmt;

use serde::{Deserialize, Serialize};

/// An uploaded document as received from the caller: opaque bytes plus the
/// declared media type. Created on upload, consumed once by extraction,
/// never persisted.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl RawDocument {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }
}

/// Which of the two request documents this is. Every failure message names
/// the role so the caller knows which document to re-upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRole {
    Bill,
    Summary,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bill => write!(f, "bill"),
            Self::Summary => write!(f, "after-care summary"),
        }
    }
}

/// The single extracted text blob for one document.
///
/// Extraction may legitimately produce an empty string (e.g. a blank page);
/// rejecting implausibly empty input is the adjudication stage's call, not
/// the normalizer's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedText {
    pub role: DocumentRole,
    pub text: String,
}

impl NormalizedText {
    pub fn new(role: DocumentRole, text: String) -> Self {
        Self { role, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_display_names_the_document() {
        assert_eq!(DocumentRole::Bill.to_string(), "bill");
        assert_eq!(DocumentRole::Summary.to_string(), "after-care summary");
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&DocumentRole::Summary).unwrap(),
            "\"summary\""
        );
    }

    #[test]
    fn normalized_text_keeps_empty_string() {
        let n = NormalizedText::new(DocumentRole::Bill, String::new());
        assert!(n.text.is_empty());
    }
}
