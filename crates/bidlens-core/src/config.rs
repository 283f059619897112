use crate::error::BidlensError;
use crate::scale::OCR_SCALE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest raster scale accepted. Scale 8 is 576 DPI, well past what OCR gains from.
const MAX_OCR_SCALE: f32 = 8.0;

/// Engine settings. Every field has a default, so `{}` is a valid config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scale pages are rasterized at for OCR. Highlight boxes are in this space.
    pub ocr_scale: f32,
    /// Tesseract language code(s), e.g. "eng" or "eng+deu".
    pub ocr_language: String,
    pub pdfinfo_path: PathBuf,
    pub pdftoppm_path: PathBuf,
    pub tesseract_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            ocr_scale: OCR_SCALE,
            ocr_language: "eng".into(),
            pdfinfo_path: "pdfinfo".into(),
            pdftoppm_path: "pdftoppm".into(),
            tesseract_path: "tesseract".into(),
        }
    }
}

/// Load a config from a JSON file.
pub fn load_config(path: &Path) -> Result<EngineConfig, BidlensError> {
    let content = std::fs::read_to_string(path).map_err(|e| BidlensError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: EngineConfig =
        serde_json::from_str(&content).map_err(|e| BidlensError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<EngineConfig, BidlensError> {
    let config: EngineConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &EngineConfig) -> Result<(), BidlensError> {
    if !config.ocr_scale.is_finite() || config.ocr_scale <= 0.0 || config.ocr_scale > MAX_OCR_SCALE
    {
        return Err(BidlensError::ConfigInvalid(format!(
            "ocr_scale must be in (0, {}], got {}",
            MAX_OCR_SCALE, config.ocr_scale
        )));
    }

    if config.ocr_language.trim().is_empty() {
        return Err(BidlensError::ConfigInvalid(
            "ocr_language must not be empty".into(),
        ));
    }

    for (name, path) in [
        ("pdfinfo_path", &config.pdfinfo_path),
        ("pdftoppm_path", &config.pdftoppm_path),
        ("tesseract_path", &config.tesseract_path),
    ] {
        if path.as_os_str().is_empty() {
            return Err(BidlensError::ConfigInvalid(format!(
                "{name} must not be empty"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = parse_config_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.ocr_scale, 2.0);
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config_str(r#"{ "ocr_scale": 3, "ocr_language": "eng+deu" }"#).unwrap();
        assert_eq!(config.ocr_scale, 3.0);
        assert_eq!(config.ocr_language, "eng+deu");
        assert_eq!(config.tesseract_path, PathBuf::from("tesseract"));
    }

    #[test]
    fn test_bad_scale_rejected() {
        assert!(parse_config_str(r#"{ "ocr_scale": 0 }"#).is_err());
        assert!(parse_config_str(r#"{ "ocr_scale": -1 }"#).is_err());
        assert!(parse_config_str(r#"{ "ocr_scale": 12 }"#).is_err());
    }

    #[test]
    fn test_empty_language_rejected() {
        assert!(parse_config_str(r#"{ "ocr_language": " " }"#).is_err());
    }

    #[test]
    fn test_empty_tool_path_rejected() {
        assert!(parse_config_str(r#"{ "tesseract_path": "" }"#).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/no/such/bidlens.json")).unwrap_err();
        assert!(matches!(err, BidlensError::ConfigLoad { .. }));
    }
}
