//! Provider integration
//!
//! Pure half of the AI collaborator: prompt assembly and interpretation of
//! the reply text. The model call itself lives in the shell.

pub mod extract;
pub mod prompt;

use thiserror::Error;

pub use extract::{interpret_reply, parse_error_detection};
pub use prompt::build_prompt;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Model request failed: {0}")]
    Completion(String),

    #[error("Model request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("OCR failed: {0}")]
    Ocr(String),
}
