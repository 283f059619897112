use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BidlensError {
    #[error("PDF rasterization failed: {0}")]
    Rasterize(String),

    #[error("{tool} not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PopplerNotFound { tool: String },

    #[error("tesseract not found. Install it: brew install tesseract (macOS) or apt install tesseract-ocr (Linux)")]
    TesseractNotFound,

    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("OCR failed on page {page_index}: {reason}")]
    Ocr { page_index: usize, reason: String },

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("invalid json in extraction response: {0}")]
    InvalidJson(String),

    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    #[error("not a price: '{0}'")]
    InvalidPrice(String),

    #[error("no extraction providers configured")]
    NoProvidersConfigured,

    #[error("extraction aborted by non-retryable error from {provider}. {summary}")]
    ExtractionAborted { provider: String, summary: String },

    #[error("All providers failed. {summary}")]
    AllProvidersFailed { summary: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
