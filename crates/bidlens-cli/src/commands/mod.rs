pub mod find;
pub mod locate;
pub mod ocr;
pub mod validate;

use bidlens_core::config::{load_config, EngineConfig};
use bidlens_core::error::BidlensError;
use bidlens_core::model::PageOcrData;
use std::path::Path;

/// Config from `--config`, or the defaults.
fn engine_config(path: Option<&Path>) -> Result<EngineConfig, BidlensError> {
    match path {
        Some(p) => load_config(p),
        None => Ok(EngineConfig::default()),
    }
}

/// Read an OCR transcript written by `bidlens ocr`.
fn load_transcript(path: &Path) -> Result<Vec<PageOcrData>, BidlensError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
