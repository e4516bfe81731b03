use serde::{Deserialize, Serialize};

use super::AdjudicationError;

/// Fixed sampling seed. Together with temperature 0 this pins the decision
/// procedure so identical (bill, summary) inputs reproduce identical
/// verdicts across runs.
const DECISION_SEED: u64 = 4217;

/// Text-generation seam for the adjudication passes.
pub trait LlmClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, AdjudicationError>;
}

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, AdjudicationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AdjudicationError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    /// Default Ollama instance at localhost:11434 with 5-minute timeout.
    pub fn default_local() -> Result<Self, AdjudicationError> {
        Self::new("http://localhost:11434", 300)
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

/// Greedy decoding with a pinned seed, for reproducible verdicts.
#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    seed: u64,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, AdjudicationError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            options: GenerateOptions {
                temperature: 0.0,
                seed: DECISION_SEED,
            },
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                AdjudicationError::OllamaConnection(self.base_url.clone())
            } else if e.is_timeout() {
                AdjudicationError::HttpClient(format!(
                    "request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                AdjudicationError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AdjudicationError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| AdjudicationError::MalformedResponse(e.to_string()))?;

        Ok(parsed.response)
    }
}

/// Mock LLM client for testing — replays a scripted sequence of responses,
/// one per generate call (the engine makes up to three). The last response
/// repeats if the script runs out.
pub struct MockLlmClient {
    responses: std::sync::Mutex<std::collections::VecDeque<String>>,
    last: String,
}

impl MockLlmClient {
    pub fn new(responses: &[&str]) -> Self {
        let last = responses.last().map(|s| s.to_string()).unwrap_or_default();
        Self {
            responses: std::sync::Mutex::new(
                responses.iter().map(|s| s.to_string()).collect(),
            ),
            last,
        }
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
    ) -> Result<String, AdjudicationError> {
        let mut queue = self
            .responses
            .lock()
            .map_err(|_| AdjudicationError::HttpClient("mock poisoned".into()))?;
        Ok(queue.pop_front().unwrap_or_else(|| self.last.clone()))
    }
}
