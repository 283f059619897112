pub mod poppler;
pub mod tesseract;

use crate::error::BidlensError;
use crate::model::{OcrWord, PageOcrData};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};

/// A page rendered to PNG for OCR.
#[derive(Debug, Clone)]
pub struct RasterPage {
    /// 0-based.
    pub page_index: usize,
    pub png: Vec<u8>,
}

/// Words recognized on one raster page, with the raster dimensions.
#[derive(Debug, Clone)]
pub struct RecognizedPage {
    pub words: Vec<OcrWord>,
    pub width: f32,
    pub height: f32,
}

/// Trait for backends that render document pages to images.
pub trait PageRasterizer {
    fn page_count(&self) -> Result<usize, BidlensError>;

    /// Render a 0-based page at `scale` (1.0 = 72 DPI).
    fn render_page(&self, page_index: usize, scale: f32) -> Result<RasterPage, BidlensError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Trait for OCR backends.
///
/// An engine is a single-threaded handle: `recognize` takes `&mut self`, and
/// [`transcribe_document`] takes ownership so the engine is released exactly once,
/// after the last page.
pub trait OcrEngine {
    fn recognize(&mut self, page: &RasterPage) -> Result<RecognizedPage, BidlensError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrProgress {
    /// 1-based number of the page just completed.
    pub current_page: usize,
    pub total_pages: usize,
    pub status: String,
}

/// OCR every page of a document, one page at a time, with a single engine.
///
/// `on_progress` runs once after each completed page. `abort` is checked before
/// each page; once set, no further page is started and the pages completed so far
/// are returned. A page already being recognized is not interrupted.
pub fn transcribe_document<E: OcrEngine>(
    rasterizer: &dyn PageRasterizer,
    mut engine: E,
    scale: f32,
    mut on_progress: impl FnMut(&OcrProgress),
    abort: &AtomicBool,
) -> Result<Vec<PageOcrData>, BidlensError> {
    let total_pages = rasterizer.page_count()?;
    tracing::info!(
        "starting OCR of {} pages ({} -> {}, scale {})",
        total_pages,
        rasterizer.backend_name(),
        engine.backend_name(),
        scale
    );

    let mut pages = Vec::with_capacity(total_pages);
    for page_index in 0..total_pages {
        if abort.load(Ordering::Relaxed) {
            tracing::warn!(
                "OCR aborted after {} of {} pages",
                pages.len(),
                total_pages
            );
            break;
        }

        let raster = rasterizer.render_page(page_index, scale)?;
        let recognized = engine.recognize(&raster)?;
        tracing::debug!(
            page = page_index + 1,
            words = recognized.words.len(),
            "page recognized"
        );

        pages.push(PageOcrData {
            page_index,
            words: recognized.words,
            width: recognized.width,
            height: recognized.height,
        });

        on_progress(&OcrProgress {
            current_page: page_index + 1,
            total_pages,
            status: format!("Analyzed page {} of {}", page_index + 1, total_pages),
        });
    }

    drop(engine);
    tracing::info!("OCR complete: {} pages", pages.len());
    Ok(pages)
}

/// Run an external tool and return its stdout.
///
/// `not_found` builds the error reported when the program is not installed.
pub(crate) fn run_tool<I, S>(
    program: &Path,
    args: I,
    not_found: impl FnOnce() -> BidlensError,
) -> Result<Vec<u8>, BidlensError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let tool = program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string());

    let output = Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            not_found()
        } else {
            BidlensError::ToolFailed {
                tool: tool.clone(),
                code: -1,
                stderr: e.to_string(),
            }
        }
    })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(BidlensError::ToolFailed { tool, code, stderr });
    }

    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WordBox;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeRasterizer {
        pages: usize,
    }

    impl PageRasterizer for FakeRasterizer {
        fn page_count(&self) -> Result<usize, BidlensError> {
            Ok(self.pages)
        }

        fn render_page(&self, page_index: usize, _scale: f32) -> Result<RasterPage, BidlensError> {
            Ok(RasterPage {
                page_index,
                png: vec![],
            })
        }

        fn backend_name(&self) -> &str {
            "fake"
        }
    }

    struct CountingEngine {
        calls: usize,
        released: Rc<Cell<usize>>,
        fail_on: Option<usize>,
    }

    impl OcrEngine for CountingEngine {
        fn recognize(&mut self, page: &RasterPage) -> Result<RecognizedPage, BidlensError> {
            self.calls += 1;
            if self.fail_on == Some(page.page_index) {
                return Err(BidlensError::Ocr {
                    page_index: page.page_index,
                    reason: "boom".into(),
                });
            }
            Ok(RecognizedPage {
                words: vec![OcrWord {
                    text: format!("p{}", page.page_index),
                    bbox: WordBox {
                        x0: 0.0,
                        y0: 0.0,
                        x1: 10.0,
                        y1: 10.0,
                    },
                    confidence: 90.0,
                }],
                width: 1224.0,
                height: 1584.0,
            })
        }

        fn backend_name(&self) -> &str {
            "counting"
        }
    }

    impl Drop for CountingEngine {
        fn drop(&mut self) {
            self.released.set(self.released.get() + 1);
        }
    }

    fn engine(released: &Rc<Cell<usize>>, fail_on: Option<usize>) -> CountingEngine {
        CountingEngine {
            calls: 0,
            released: Rc::clone(released),
            fail_on,
        }
    }

    #[test]
    fn test_pages_processed_in_order_with_progress() {
        let released = Rc::new(Cell::new(0));
        let mut progress = Vec::new();
        let pages = transcribe_document(
            &FakeRasterizer { pages: 3 },
            engine(&released, None),
            2.0,
            |p| progress.push(p.current_page),
            &AtomicBool::new(false),
        )
        .unwrap();

        assert_eq!(pages.iter().map(|p| p.page_index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(pages[2].words[0].text, "p2");
        assert_eq!(progress, vec![1, 2, 3]);
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_abort_stops_between_pages() {
        let released = Rc::new(Cell::new(0));
        let abort = AtomicBool::new(false);
        let pages = transcribe_document(
            &FakeRasterizer { pages: 5 },
            engine(&released, None),
            2.0,
            |p| {
                if p.current_page == 2 {
                    abort.store(true, Ordering::Relaxed);
                }
            },
            &abort,
        )
        .unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_engine_released_on_error() {
        let released = Rc::new(Cell::new(0));
        let result = transcribe_document(
            &FakeRasterizer { pages: 3 },
            engine(&released, Some(1)),
            2.0,
            |_| {},
            &AtomicBool::new(false),
        );
        assert!(result.is_err());
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_empty_document() {
        let released = Rc::new(Cell::new(0));
        let pages = transcribe_document(
            &FakeRasterizer { pages: 0 },
            engine(&released, None),
            2.0,
            |_| panic!("no pages, no progress"),
            &AtomicBool::new(false),
        )
        .unwrap();
        assert!(pages.is_empty());
    }
}
