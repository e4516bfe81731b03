use std::net::SocketAddr;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Clearbill";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info,clearbill=debug"
}

/// Runtime configuration, resolved once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Base URL of the local Ollama instance.
    pub ollama_url: String,
    /// Model for code extraction and appeal drafting.
    pub extraction_model: String,
    /// Model for the documentation review pass.
    pub review_model: String,
    /// Per-request timeout for LLM calls.
    pub llm_timeout: Duration,
    /// Single-language hint for OCR (Tesseract traineddata name).
    pub ocr_language: String,
    /// Upper bound on optical recognition per document.
    pub ocr_timeout: Duration,
    /// Tessdata directory for the bundled OCR engine.
    pub tessdata_dir: std::path::PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: ([127, 0, 0, 1], 8000).into(),
            ollama_url: "http://localhost:11434".into(),
            extraction_model: "llama3.1:8b".into(),
            review_model: "llama3.1:8b".into(),
            llm_timeout: Duration::from_secs(300),
            ocr_language: "eng".into(),
            ocr_timeout: Duration::from_secs(120),
            tessdata_dir: "/usr/share/tesseract-ocr/5/tessdata".into(),
        }
    }
}

impl Config {
    /// Read configuration from CLEARBILL_* environment variables, falling
    /// back to the defaults above for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: env_parse("CLEARBILL_BIND", defaults.bind_addr),
            ollama_url: env_string("CLEARBILL_OLLAMA_URL", defaults.ollama_url),
            extraction_model: env_string("CLEARBILL_EXTRACTION_MODEL", defaults.extraction_model),
            review_model: env_string("CLEARBILL_REVIEW_MODEL", defaults.review_model),
            llm_timeout: Duration::from_secs(env_parse(
                "CLEARBILL_LLM_TIMEOUT_SECS",
                defaults.llm_timeout.as_secs(),
            )),
            ocr_language: env_string("CLEARBILL_OCR_LANG", defaults.ocr_language),
            ocr_timeout: Duration::from_secs(env_parse(
                "CLEARBILL_OCR_TIMEOUT_SECS",
                defaults.ocr_timeout.as_secs(),
            )),
            tessdata_dir: env_parse("CLEARBILL_TESSDATA_DIR", defaults.tessdata_dir),
        }
    }
}

fn env_string(key: &str, default: String) -> String {
    std::env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
