use crate::config::EngineConfig;
use crate::error::BidlensError;
use crate::model::{OcrWord, WordBox};
use crate::ocr::{run_tool, OcrEngine, RasterPage, RecognizedPage};
use std::ffi::OsStr;
use std::path::PathBuf;

/// TSV row level for a whole page.
const LEVEL_PAGE: u32 = 1;
/// TSV row level for a single word.
const LEVEL_WORD: u32 = 5;

/// OCR engine that shells out to the `tesseract` CLI with TSV output.
///
/// Each page image is written into a scratch directory owned by the engine, which
/// is removed when the engine is dropped.
pub struct TesseractEngine {
    tesseract: PathBuf,
    language: String,
    scratch: tempfile::TempDir,
}

impl TesseractEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, BidlensError> {
        let scratch = tempfile::tempdir()?;
        Ok(TesseractEngine {
            tesseract: config.tesseract_path.clone(),
            language: config.ocr_language.clone(),
            scratch,
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&mut self, page: &RasterPage) -> Result<RecognizedPage, BidlensError> {
        let image = self.scratch.path().join("page.png");
        std::fs::write(&image, &page.png)?;

        let stdout = run_tool(
            &self.tesseract,
            [
                image.as_os_str(),
                OsStr::new("stdout"),
                OsStr::new("-l"),
                OsStr::new(&self.language),
                OsStr::new("tsv"),
            ],
            || BidlensError::TesseractNotFound,
        )?;

        let tsv = String::from_utf8_lossy(&stdout);
        let mut recognized = parse_tsv(&tsv).map_err(|reason| BidlensError::Ocr {
            page_index: page.page_index,
            reason,
        })?;

        if recognized.width <= 0.0 || recognized.height <= 0.0 {
            (recognized.width, recognized.height) = raster_size(page)?;
        }

        Ok(recognized)
    }

    fn backend_name(&self) -> &str {
        "tesseract"
    }
}

/// Parse tesseract's TSV output.
///
/// Columns: level, page_num, block_num, par_num, line_num, word_num, left, top,
/// width, height, conf, text. Word rows with blank text are dropped.
pub fn parse_tsv(tsv: &str) -> Result<RecognizedPage, String> {
    let mut page = RecognizedPage {
        words: Vec::new(),
        width: 0.0,
        height: 0.0,
    };

    for (n, line) in tsv.lines().enumerate() {
        if line.is_empty() || line.starts_with("level") {
            continue;
        }
        let cols: Vec<&str> = line.splitn(12, '\t').collect();
        if cols.len() < 11 {
            return Err(format!("line {}: expected 12 columns, got {}", n + 1, cols.len()));
        }

        let num = |i: usize| -> Result<f32, String> {
            cols[i]
                .trim()
                .parse::<f32>()
                .map_err(|_| format!("line {}: bad number '{}'", n + 1, cols[i]))
        };

        let level = num(0)? as u32;
        let (left, top, width, height) = (num(6)?, num(7)?, num(8)?, num(9)?);

        match level {
            LEVEL_PAGE => {
                page.width = width;
                page.height = height;
            }
            LEVEL_WORD => {
                let text = cols.get(11).map(|t| t.trim()).unwrap_or("");
                if text.is_empty() {
                    continue;
                }
                page.words.push(OcrWord {
                    text: text.to_string(),
                    bbox: WordBox {
                        x0: left,
                        y0: top,
                        x1: left + width,
                        y1: top + height,
                    },
                    confidence: num(10)?,
                });
            }
            _ => {}
        }
    }

    Ok(page)
}

/// Pixel dimensions of a rendered page, read from its image header.
fn raster_size(page: &RasterPage) -> Result<(f32, f32), BidlensError> {
    let size = imagesize::blob_size(&page.png).map_err(|e| BidlensError::Ocr {
        page_index: page.page_index,
        reason: format!("page dimensions unknown: {e}"),
    })?;
    Ok((size.width as f32, size.height as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t1224\t1584\t-1\t
2\t1\t1\t0\t0\t0\t96\t300\t600\t20\t-1\t
4\t1\t1\t1\t1\t0\t96\t300\t600\t20\t-1\t
5\t1\t1\t1\t1\t1\t100\t300\t90\t20\t96.5\tTK-5031
5\t1\t1\t1\t1\t2\t200\t300\t5\t20\t10\t
5\t1\t1\t1\t1\t3\t600\t302\t80\t18\t91\t$1,234.00
";

    #[test]
    fn test_parse_words_and_page_size() {
        let page = parse_tsv(TSV).unwrap();
        assert_eq!(page.width, 1224.0);
        assert_eq!(page.height, 1584.0);
        assert_eq!(page.words.len(), 2);

        let tag = &page.words[0];
        assert_eq!(tag.text, "TK-5031");
        assert_eq!(tag.bbox.x1, 190.0);
        assert_eq!(tag.bbox.y1, 320.0);
        assert_eq!(tag.confidence, 96.5);
        assert_eq!(page.words[1].text, "$1,234.00");
    }

    #[test]
    fn test_short_row_rejected() {
        assert!(parse_tsv("5\t1\t1\n").is_err());
    }

    #[test]
    fn test_page_size_read_from_png_header() {
        let mut png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
        png.extend_from_slice(&1224u32.to_be_bytes());
        png.extend_from_slice(&1584u32.to_be_bytes());
        png.extend_from_slice(&[8, 6, 0, 0, 0]);
        let page = RasterPage { page_index: 0, png };
        assert_eq!(raster_size(&page).unwrap(), (1224.0, 1584.0));

        let garbage = RasterPage {
            page_index: 3,
            png: b"not a png".to_vec(),
        };
        assert!(matches!(
            raster_size(&garbage),
            Err(BidlensError::Ocr { page_index: 3, .. })
        ));
    }

    #[test]
    fn test_missing_binary_reported() {
        let config = EngineConfig {
            tesseract_path: "/nonexistent/tesseract".into(),
            ..EngineConfig::default()
        };
        let mut engine = TesseractEngine::new(&config).unwrap();
        let err = engine
            .recognize(&RasterPage {
                page_index: 0,
                png: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, BidlensError::TesseractNotFound));
    }
}
