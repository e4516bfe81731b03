use std::sync::LazyLock;

use regex::Regex;

use crate::document::{DocumentRole, NormalizedText, RawDocument};

use super::format::{classify_media_type, ExtractionStrategy};
use super::ocr::OcrEngine;
use super::pdf::NativeTextExtract;
use super::progress::ProgressReporter;
use super::ExtractionError;

/// Turns one raw document into one normalized text blob.
///
/// Dispatches on the declared media type: native text extraction for PDFs,
/// OCR for images. Unsupported types fail immediately — no extractor is
/// invoked and no partial text is returned. The two extractor seams are
/// trait objects so tests can substitute mocks.
pub struct DocumentNormalizer {
    native: Box<dyn NativeTextExtract + Send + Sync>,
    ocr: Box<dyn OcrEngine + Send + Sync>,
}

impl DocumentNormalizer {
    pub fn new(
        native: Box<dyn NativeTextExtract + Send + Sync>,
        ocr: Box<dyn OcrEngine + Send + Sync>,
    ) -> Self {
        Self { native, ocr }
    }

    /// Extract and normalize `document` into UTF-8 text.
    ///
    /// On success the text is always an owned (possibly empty) string;
    /// deciding whether empty text is usable is left to adjudication.
    pub fn normalize(
        &self,
        document: &RawDocument,
        role: DocumentRole,
        progress: &ProgressReporter,
    ) -> Result<NormalizedText, ExtractionError> {
        let strategy = classify_media_type(&document.media_type);
        tracing::info!(
            %role,
            media_type = %document.media_type,
            strategy = strategy.as_str(),
            size_bytes = document.bytes.len(),
            "Starting text extraction"
        );

        let text = match strategy {
            ExtractionStrategy::NativeText => self.native.extract_text(&document.bytes)?,
            ExtractionStrategy::Optical => self.ocr.recognize(&document.bytes, progress)?,
            ExtractionStrategy::Unsupported => {
                return Err(ExtractionError::UnsupportedFormat(
                    document.media_type.clone(),
                ));
            }
        };

        let text = clean_text(&text);
        tracing::info!(%role, text_length = text.len(), "Text extraction complete");
        Ok(NormalizedText::new(role, text))
    }
}

static TRAILING_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+\n").unwrap());
static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalize extracted text: unify line endings, strip trailing whitespace,
/// and collapse runs of blank lines. Line-internal spacing is preserved —
/// OCR output often aligns columns with it.
fn clean_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let stripped = TRAILING_WS.replace_all(&unified, "\n");
    BLANK_RUNS.replace_all(&stripped, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ocr::MockOcrEngine;
    use crate::extraction::pdf::MockNativeExtractor;

    /// OCR engine that panics if invoked — proves dispatch never reaches it.
    struct PanickingOcr;

    impl OcrEngine for PanickingOcr {
        fn recognize(
            &self,
            _image_bytes: &[u8],
            _progress: &ProgressReporter,
        ) -> Result<String, ExtractionError> {
            panic!("OCR must not be invoked for this media type");
        }
    }

    /// Native extractor that panics if invoked.
    struct PanickingNative;

    impl NativeTextExtract for PanickingNative {
        fn extract_text(&self, _bytes: &[u8]) -> Result<String, ExtractionError> {
            panic!("native extraction must not be invoked for this media type");
        }
    }

    #[test]
    fn pdf_routes_to_native_extractor() {
        let normalizer = DocumentNormalizer::new(
            Box::new(MockNativeExtractor::returning("99213 $150.00")),
            Box::new(PanickingOcr),
        );

        let doc = RawDocument::new(b"%PDF".to_vec(), "application/pdf");
        let result = normalizer
            .normalize(&doc, DocumentRole::Bill, &ProgressReporter::disabled())
            .unwrap();

        assert_eq!(result.role, DocumentRole::Bill);
        assert!(result.text.contains("99213"));
    }

    #[test]
    fn image_routes_to_ocr() {
        let normalizer = DocumentNormalizer::new(
            Box::new(PanickingNative),
            Box::new(MockOcrEngine::returning("Discharge instructions")),
        );

        let doc = RawDocument::new(vec![0xFF, 0xD8], "image/jpeg");
        let result = normalizer
            .normalize(&doc, DocumentRole::Summary, &ProgressReporter::disabled())
            .unwrap();

        assert_eq!(result.role, DocumentRole::Summary);
        assert_eq!(result.text, "Discharge instructions");
    }

    #[test]
    fn unsupported_type_never_touches_an_extractor() {
        let normalizer =
            DocumentNormalizer::new(Box::new(PanickingNative), Box::new(PanickingOcr));

        let doc = RawDocument::new(b"code,charge\n".to_vec(), "text/csv");
        let err = normalizer
            .normalize(&doc, DocumentRole::Bill, &ProgressReporter::disabled())
            .unwrap_err();

        match err {
            ExtractionError::UnsupportedFormat(media_type) => {
                assert_eq!(media_type, "text/csv");
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn native_failure_does_not_fall_back_to_ocr() {
        let normalizer = DocumentNormalizer::new(
            Box::new(MockNativeExtractor::failing("damaged xref table")),
            Box::new(PanickingOcr),
        );

        let doc = RawDocument::new(b"%PDF".to_vec(), "application/pdf");
        let err = normalizer
            .normalize(&doc, DocumentRole::Bill, &ProgressReporter::disabled())
            .unwrap_err();
        assert!(matches!(err, ExtractionError::PdfParsing(_)));
    }

    #[test]
    fn garbled_image_fails_extraction() {
        let normalizer = DocumentNormalizer::new(
            Box::new(PanickingNative),
            Box::new(MockOcrEngine::failing("unreadable image")),
        );

        let doc = RawDocument::new(vec![0u8; 16], "image/png");
        let err = normalizer
            .normalize(&doc, DocumentRole::Summary, &ProgressReporter::disabled())
            .unwrap_err();
        assert!(matches!(err, ExtractionError::OcrProcessing(_)));
    }

    #[test]
    fn empty_extracted_text_is_a_valid_result() {
        let normalizer = DocumentNormalizer::new(
            Box::new(MockNativeExtractor::returning("")),
            Box::new(PanickingOcr),
        );

        let doc = RawDocument::new(b"%PDF".to_vec(), "application/pdf");
        let result = normalizer
            .normalize(&doc, DocumentRole::Bill, &ProgressReporter::disabled())
            .unwrap();
        assert!(result.text.is_empty());
    }

    #[test]
    fn extracted_text_is_cleaned() {
        let raw = "99213  Office visit   \t\r\n\r\n\r\n\r\n71046 Chest X-ray\r\n";
        let normalizer = DocumentNormalizer::new(
            Box::new(MockNativeExtractor::returning(raw)),
            Box::new(PanickingOcr),
        );

        let doc = RawDocument::new(b"%PDF".to_vec(), "application/pdf");
        let result = normalizer
            .normalize(&doc, DocumentRole::Bill, &ProgressReporter::disabled())
            .unwrap();

        // Line-internal spacing survives; trailing whitespace and blank-line
        // runs do not.
        assert_eq!(result.text, "99213  Office visit\n\n71046 Chest X-ray");
    }
}
