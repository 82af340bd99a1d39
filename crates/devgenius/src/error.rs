#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("No Gemini API key configured. Run `devgenius key set <KEY>` or set GEMINI_API_KEY")]
    MissingApiKey,

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    #[error("Unable to determine the configuration directory")]
    NoConfigDir,

    #[error("Request failed: {0}")]
    RequestFailed(String),
}
