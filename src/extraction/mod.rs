pub mod format;
pub mod normalizer;
pub mod ocr;
pub mod pdf;
pub mod progress;

pub use format::*;
pub use normalizer::*;
pub use ocr::*;
pub use pdf::*;
pub use progress::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported media type: {0}")]
    UnsupportedFormat(String),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("PDF contains no extractable text layer")]
    NoTextLayer,

    #[error("OCR initialization failed: {0}")]
    OcrInit(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("tessdata not found at: {0}")]
    TessdataNotFound(std::path::PathBuf),

    #[error("extraction task failed: {0}")]
    TaskFailed(String),
}
