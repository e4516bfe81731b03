use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use clearbill::adjudication::{BillAdjudicator, OllamaClient};
use clearbill::analyzer::BillAnalyzer;
use clearbill::api::api_router;
use clearbill::config::{self, Config};
use clearbill::extraction::{DocumentNormalizer, OcrEngine, PdfTextExtractor};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        version = config::APP_VERSION,
        bind = %config.bind_addr,
        ollama = %config.ollama_url,
        "Starting {}",
        config::APP_NAME
    );

    let llm = OllamaClient::new(&config.ollama_url, config.llm_timeout.as_secs())?;
    let adjudicator = BillAdjudicator::new(
        Box::new(llm),
        &config.extraction_model,
        &config.review_model,
    );

    let normalizer = DocumentNormalizer::new(
        Box::new(PdfTextExtractor),
        build_ocr_engine(&config),
    );

    let analyzer = Arc::new(BillAnalyzer::new(
        normalizer,
        adjudicator,
        config.ocr_timeout,
    ));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Listening");
    axum::serve(listener, api_router(analyzer)).await?;

    Ok(())
}

#[cfg(feature = "ocr")]
fn build_ocr_engine(config: &Config) -> Box<dyn OcrEngine + Send + Sync> {
    use clearbill::extraction::{TesseractOcr, UnavailableOcr};

    match TesseractOcr::new(&config.tessdata_dir, &config.ocr_language) {
        Ok(engine) => Box::new(engine),
        Err(e) => {
            tracing::warn!(error = %e, "OCR engine unavailable; image uploads will fail");
            Box::new(UnavailableOcr)
        }
    }
}

#[cfg(not(feature = "ocr"))]
fn build_ocr_engine(_config: &Config) -> Box<dyn OcrEngine + Send + Sync> {
    use clearbill::extraction::UnavailableOcr;

    tracing::warn!("Built without the 'ocr' feature; image uploads will fail");
    Box::new(UnavailableOcr)
}
