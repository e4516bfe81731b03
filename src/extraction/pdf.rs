use super::ExtractionError;

/// Text extraction from formats that carry a native text layer.
pub trait NativeTextExtract {
    /// Extract the full text, pages joined with a newline in page order.
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Native-text extractor for digital PDFs, backed by the pdf-extract crate.
///
/// Scanned PDFs are out of scope here: a PDF that parses but yields no text
/// layer fails with `NoTextLayer` rather than silently falling back to OCR.
pub struct PdfTextExtractor;

impl NativeTextExtract for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

        if pages.iter().all(|p| p.trim().is_empty()) {
            return Err(ExtractionError::NoTextLayer);
        }

        Ok(pages.join("\n"))
    }
}

/// Mock native extractor for tests that don't need a real PDF.
#[cfg(test)]
pub struct MockNativeExtractor {
    pub text: Result<String, String>,
}

#[cfg(test)]
impl MockNativeExtractor {
    pub fn returning(text: &str) -> Self {
        Self {
            text: Ok(text.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            text: Err(message.to_string()),
        }
    }
}

#[cfg(test)]
impl NativeTextExtract for MockNativeExtractor {
    fn extract_text(&self, _bytes: &[u8]) -> Result<String, ExtractionError> {
        self.text
            .clone()
            .map_err(ExtractionError::PdfParsing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a minimal one-page PDF with a text layer via lopdf.
    fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let resources = dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extracts_text_from_digital_pdf() {
        let bytes = make_test_pdf("ITEMIZED STATEMENT 99213 $150.00");
        let text = PdfTextExtractor.extract_text(&bytes).unwrap();
        assert!(
            text.contains("99213") || text.contains("ITEMIZED"),
            "expected bill content, got: {text}"
        );
    }

    #[test]
    fn malformed_bytes_fail_as_pdf_parsing() {
        let result = PdfTextExtractor.extract_text(b"not a pdf at all");
        assert!(matches!(result, Err(ExtractionError::PdfParsing(_))));
    }

    #[test]
    fn empty_input_fails() {
        assert!(PdfTextExtractor.extract_text(b"").is_err());
    }

    #[test]
    fn mock_extractor_round_trips() {
        let text = MockNativeExtractor::returning("CBC panel $42")
            .extract_text(b"ignored")
            .unwrap();
        assert_eq!(text, "CBC panel $42");

        let err = MockNativeExtractor::failing("corrupt xref")
            .extract_text(b"ignored")
            .unwrap_err();
        assert!(matches!(err, ExtractionError::PdfParsing(_)));
    }
}
