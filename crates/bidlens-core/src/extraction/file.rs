use crate::extraction::parse_bid_data;
use crate::extraction::provider::{DocumentInput, ExtractionProvider, ProviderError};
use crate::extraction::schema::ExtractedBidData;
use std::path::PathBuf;

/// Provider that replays a stored raw model response from disk.
///
/// The document bytes are ignored; the stored response goes through the same
/// repair and validation as a live one, so a malformed file falls back like a
/// malformed live response would.
pub struct FileProvider {
    name: String,
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!(
            "file:{}",
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        );
        FileProvider { name, path }
    }
}

impl ExtractionProvider for FileProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured(&self) -> bool {
        self.path.is_file()
    }

    fn extract(&self, _document: &DocumentInput) -> Result<ExtractedBidData, ProviderError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            ProviderError::fatal(format!("could not read {}: {e}", self.path.display()))
        })?;
        Ok(parse_bid_data(&raw)?)
    }
}
