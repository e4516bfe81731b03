use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::adjudication::{AdjudicationError, AdjudicationResult, BillAdjudicator};
use crate::document::{DocumentRole, NormalizedText, RawDocument};
use crate::extraction::{
    classify_media_type, DocumentNormalizer, ExtractionError, ExtractionStrategy,
    ProgressReporter,
};

/// One adjudication request: the two uploaded documents plus the opaque
/// insurance-plan label. The label is carried for display only and never
/// reaches the decision logic.
pub struct AnalyzeRequest {
    pub bill: RawDocument,
    pub summary: RawDocument,
    pub insurance_plan: Option<String>,
    /// Progress observers for the optical path; disabled unless replaced.
    pub bill_progress: ProgressReporter,
    pub summary_progress: ProgressReporter,
}

impl AnalyzeRequest {
    pub fn new(bill: RawDocument, summary: RawDocument, insurance_plan: Option<String>) -> Self {
        Self {
            bill,
            summary,
            insurance_plan,
            bill_progress: ProgressReporter::disabled(),
            summary_progress: ProgressReporter::disabled(),
        }
    }
}

/// Terminal failure for a request. Every message names the stage and, for
/// extraction, which document failed, so the caller can re-prompt for the
/// right upload.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("{role} document could not be processed: {source}")]
    Extraction {
        role: DocumentRole,
        #[source]
        source: ExtractionError,
    },

    #[error("adjudication failed: {0}")]
    Adjudication(#[from] AdjudicationError),
}

impl AnalyzeError {
    fn extraction(role: DocumentRole, source: ExtractionError) -> Self {
        Self::Extraction { role, source }
    }

    pub fn is_unsupported_format(&self) -> bool {
        matches!(
            self,
            Self::Extraction {
                source: ExtractionError::UnsupportedFormat(_),
                ..
            }
        )
    }
}

/// Per-request pipeline: extract both documents concurrently, then
/// adjudicate once both texts are in hand.
///
/// Extraction of the bill and the summary are independent; adjudication is
/// the single join point. The first extraction failure aborts the request
/// and the sibling's result is discarded — one valid document is never
/// adjudicated alone.
pub struct BillAnalyzer {
    normalizer: Arc<DocumentNormalizer>,
    adjudicator: Arc<BillAdjudicator>,
    ocr_timeout: Duration,
}

impl BillAnalyzer {
    pub fn new(
        normalizer: DocumentNormalizer,
        adjudicator: BillAdjudicator,
        ocr_timeout: Duration,
    ) -> Self {
        Self {
            normalizer: Arc::new(normalizer),
            adjudicator: Arc::new(adjudicator),
            ocr_timeout,
        }
    }

    pub async fn analyze(
        &self,
        request: AnalyzeRequest,
    ) -> Result<AdjudicationResult, AnalyzeError> {
        let AnalyzeRequest {
            bill,
            summary,
            insurance_plan,
            bill_progress,
            summary_progress,
        } = request;

        tracing::info!(
            bill_media_type = %bill.media_type,
            summary_media_type = %summary.media_type,
            insurance_plan = insurance_plan.as_deref().unwrap_or("(none)"),
            "Starting bill analysis"
        );

        let (bill_text, summary_text) = tokio::try_join!(
            self.extract(bill, DocumentRole::Bill, bill_progress),
            self.extract(summary, DocumentRole::Summary, summary_progress),
        )?;

        let adjudicator = Arc::clone(&self.adjudicator);
        let result = tokio::task::spawn_blocking(move || {
            adjudicator.adjudicate(&bill_text.text, &summary_text.text)
        })
        .await
        .map_err(|e| {
            AnalyzeError::Adjudication(AdjudicationError::MalformedResponse(format!(
                "adjudication task failed: {e}"
            )))
        })??;

        tracing::info!(
            line_items = result.line_items.len(),
            total_savings = result.total_savings,
            "Bill analysis complete"
        );
        Ok(result)
    }

    /// Extract one document off the async runtime. The optical path carries
    /// the configured timeout; elapse surfaces as an ordinary OCR
    /// extraction failure, not a distinct error kind.
    async fn extract(
        &self,
        document: RawDocument,
        role: DocumentRole,
        progress: ProgressReporter,
    ) -> Result<NormalizedText, AnalyzeError> {
        let strategy = classify_media_type(&document.media_type);
        let normalizer = Arc::clone(&self.normalizer);
        let task =
            tokio::task::spawn_blocking(move || normalizer.normalize(&document, role, &progress));

        let joined = if strategy == ExtractionStrategy::Optical {
            match tokio::time::timeout(self.ocr_timeout, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    return Err(AnalyzeError::extraction(
                        role,
                        ExtractionError::OcrProcessing(format!(
                            "optical recognition timed out after {}s",
                            self.ocr_timeout.as_secs()
                        )),
                    ));
                }
            }
        } else {
            task.await
        };

        joined
            .map_err(|e| AnalyzeError::extraction(role, ExtractionError::TaskFailed(e.to_string())))?
            .map_err(|e| AnalyzeError::extraction(role, e))
    }
}
