pub mod config;
pub mod error;
pub mod extraction;
pub mod locate;
pub mod model;
pub mod ocr;
pub mod report;
pub mod scale;

use config::EngineConfig;
use error::BidlensError;
use extraction::provider::{extract_with_fallback, DocumentInput, ExtractionProvider};
use extraction::schema::ExtractedBidData;
use model::PageOcrData;
use ocr::poppler::PopplerRasterizer;
use ocr::tesseract::TesseractEngine;
use ocr::{transcribe_document, OcrProgress};
use report::{build_report, HighlightReport};
use std::sync::atomic::AtomicBool;

/// Bid data extracted from a document and located on its OCR transcript.
#[derive(Debug, Clone)]
pub struct DocumentHighlights {
    /// Provider that produced `data`.
    pub provider: String,
    pub data: ExtractedBidData,
    pub report: HighlightReport,
}

/// OCR a PDF with the poppler + tesseract backends named in `config`.
///
/// Pages are rendered at `config.ocr_scale`; every box in the result is in that
/// raster space.
pub fn transcribe_pdf(
    pdf_bytes: &[u8],
    config: &EngineConfig,
    on_progress: impl FnMut(&OcrProgress),
    abort: &AtomicBool,
) -> Result<Vec<PageOcrData>, BidlensError> {
    let rasterizer = PopplerRasterizer::from_bytes(pdf_bytes, config)?;
    let engine = TesseractEngine::new(config)?;
    transcribe_document(&rasterizer, engine, config.ocr_scale, on_progress, abort)
}

/// Main API entry point: extract bid data through the provider chain, then
/// locate it on an existing OCR transcript.
pub fn highlight_document(
    ocr: &[PageOcrData],
    providers: &[Box<dyn ExtractionProvider>],
    document: &DocumentInput,
    ocr_scale: f32,
) -> Result<DocumentHighlights, BidlensError> {
    let outcome = extract_with_fallback(providers, document)?;
    let report = build_report(ocr, &outcome.data, ocr_scale);
    Ok(DocumentHighlights {
        provider: outcome.provider,
        data: outcome.data,
        report,
    })
}
