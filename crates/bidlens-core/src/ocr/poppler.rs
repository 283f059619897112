use crate::config::EngineConfig;
use crate::error::BidlensError;
use crate::ocr::{run_tool, PageRasterizer, RasterPage};
use crate::scale::raster_dpi;
use std::io::Write;
use std::path::PathBuf;

/// Rasterizer backed by poppler's `pdfinfo` and `pdftoppm`.
///
/// The PDF is written to a temp file once; each page is rendered on demand into a
/// scratch directory owned by the rasterizer.
pub struct PopplerRasterizer {
    pdf: tempfile::NamedTempFile,
    scratch: tempfile::TempDir,
    pdfinfo: PathBuf,
    pdftoppm: PathBuf,
}

impl PopplerRasterizer {
    pub fn from_bytes(pdf_bytes: &[u8], config: &EngineConfig) -> Result<Self, BidlensError> {
        let mut pdf =
            tempfile::NamedTempFile::new().map_err(|e| BidlensError::Rasterize(e.to_string()))?;
        pdf.write_all(pdf_bytes)
            .map_err(|e| BidlensError::Rasterize(e.to_string()))?;
        let scratch = tempfile::tempdir().map_err(|e| BidlensError::Rasterize(e.to_string()))?;

        Ok(PopplerRasterizer {
            pdf,
            scratch,
            pdfinfo: config.pdfinfo_path.clone(),
            pdftoppm: config.pdftoppm_path.clone(),
        })
    }
}

impl PageRasterizer for PopplerRasterizer {
    fn page_count(&self) -> Result<usize, BidlensError> {
        let stdout = run_tool(&self.pdfinfo, [self.pdf.path()], || {
            BidlensError::PopplerNotFound {
                tool: "pdfinfo".into(),
            }
        })?;
        parse_page_count(&String::from_utf8_lossy(&stdout))
            .ok_or_else(|| BidlensError::Rasterize("pdfinfo reported no page count".into()))
    }

    fn render_page(&self, page_index: usize, scale: f32) -> Result<RasterPage, BidlensError> {
        // pdftoppm pages are 1-based
        let page_number = (page_index + 1).to_string();
        let prefix = self.scratch.path().join("page");
        let args: Vec<std::ffi::OsString> = vec![
            "-f".into(),
            page_number.as_str().into(),
            "-l".into(),
            page_number.as_str().into(),
            "-r".into(),
            raster_dpi(scale).to_string().into(),
            "-png".into(),
            "-singlefile".into(),
            self.pdf.path().into(),
            prefix.as_os_str().into(),
        ];
        run_tool(&self.pdftoppm, &args, || BidlensError::PopplerNotFound {
            tool: "pdftoppm".into(),
        })?;

        let png_path = prefix.with_extension("png");
        let png = std::fs::read(&png_path).map_err(|e| {
            BidlensError::Rasterize(format!("page {page_number} was not rendered: {e}"))
        })?;
        Ok(RasterPage { page_index, png })
    }

    fn backend_name(&self) -> &str {
        "pdftoppm"
    }
}

/// Read the "Pages:" line of `pdfinfo` output.
fn parse_page_count(info: &str) -> Option<usize> {
    info.lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|rest| rest.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_count() {
        let info = "Title:          Quote 4471\nProducer:       Acme PDF\nPages:          3\nEncrypted:      no\n";
        assert_eq!(parse_page_count(info), Some(3));
    }

    #[test]
    fn test_parse_page_count_missing() {
        assert_eq!(parse_page_count("Title: x\n"), None);
    }

    #[test]
    fn test_missing_pdfinfo_reported() {
        let config = EngineConfig {
            pdfinfo_path: "/nonexistent/pdfinfo".into(),
            ..EngineConfig::default()
        };
        let r = PopplerRasterizer::from_bytes(b"%PDF-1.4", &config).unwrap();
        let err = r.page_count().unwrap_err();
        assert!(matches!(err, BidlensError::PopplerNotFound { .. }));
    }
}
