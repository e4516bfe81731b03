use super::progress::ProgressReporter;
use super::ExtractionError;

/// Optical character recognition over raster image bytes.
///
/// Implementations run with a single fixed language model and default engine
/// settings; no per-word confidence is surfaced. Progress is reported
/// through the `ProgressReporter` for observability only — recognition must
/// run to completion whether or not anyone watches.
pub trait OcrEngine {
    fn recognize(
        &self,
        image_bytes: &[u8],
        progress: &ProgressReporter,
    ) -> Result<String, ExtractionError>;
}

/// Bundled Tesseract OCR engine.
/// Only available when compiled with the `ocr` feature flag.
#[cfg(feature = "ocr")]
pub struct TesseractOcr {
    tessdata_dir: std::path::PathBuf,
    language: String,
}

#[cfg(feature = "ocr")]
impl TesseractOcr {
    /// Initialize against a tessdata directory with a single language hint
    /// (e.g. "eng"). Fails up front if the traineddata is missing.
    pub fn new(tessdata_dir: &std::path::Path, language: &str) -> Result<Self, ExtractionError> {
        let traineddata = tessdata_dir.join(format!("{language}.traineddata"));
        if !traineddata.exists() {
            return Err(ExtractionError::TessdataNotFound(tessdata_dir.to_path_buf()));
        }

        tracing::info!(
            tessdata = %tessdata_dir.display(),
            language,
            "Tesseract OCR engine ready"
        );

        Ok(Self {
            tessdata_dir: tessdata_dir.to_path_buf(),
            language: language.to_string(),
        })
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for TesseractOcr {
    fn recognize(
        &self,
        image_bytes: &[u8],
        progress: &ProgressReporter,
    ) -> Result<String, ExtractionError> {
        let tessdata = self
            .tessdata_dir
            .to_str()
            .ok_or_else(|| ExtractionError::OcrInit("invalid tessdata path".into()))?;

        let tess = tesseract::Tesseract::new(Some(tessdata), Some(&self.language))
            .map_err(|e| ExtractionError::OcrInit(format!("{e:?}")))?;
        progress.report(0.10);

        let mut tess = tess
            .set_image_from_mem(image_bytes)
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;
        progress.report(0.35);

        let text = tess
            .get_text()
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;
        progress.report(1.0);

        Ok(text)
    }
}

/// Placeholder engine for builds without the `ocr` feature: image input is
/// accepted at the API but recognition fails with a typed error instead of
/// being silently skipped.
pub struct UnavailableOcr;

impl OcrEngine for UnavailableOcr {
    fn recognize(
        &self,
        _image_bytes: &[u8],
        _progress: &ProgressReporter,
    ) -> Result<String, ExtractionError> {
        Err(ExtractionError::OcrInit(
            "built without the 'ocr' feature; optical recognition is unavailable".into(),
        ))
    }
}

/// Mock OCR engine for unit testing without Tesseract.
pub struct MockOcrEngine {
    text: Result<String, String>,
}

impl MockOcrEngine {
    pub fn returning(text: &str) -> Self {
        Self {
            text: Ok(text.to_string()),
        }
    }

    /// Simulates an unreadable/garbled image.
    pub fn failing(message: &str) -> Self {
        Self {
            text: Err(message.to_string()),
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn recognize(
        &self,
        _image_bytes: &[u8],
        progress: &ProgressReporter,
    ) -> Result<String, ExtractionError> {
        progress.report(0.25);
        progress.report(0.75);
        let text = self
            .text
            .clone()
            .map_err(ExtractionError::OcrProcessing)?;
        progress.report(1.0);
        Ok(text)
    }
}
