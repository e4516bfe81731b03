pub mod engine;
pub mod llm;
pub mod parser;
pub mod prompt;
pub mod types;

pub use engine::*;
pub use llm::*;
pub use parser::*;
pub use types::*;

use thiserror::Error;

use crate::document::DocumentRole;

#[derive(Error, Debug)]
pub enum AdjudicationError {
    #[error("{0} text is empty; nothing to adjudicate")]
    EmptyInput(DocumentRole),

    #[error("Ollama is not running at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),
}
