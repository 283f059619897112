use bidlens_core::error::BidlensError;
use bidlens_core::extraction::file::FileProvider;
use bidlens_core::extraction::provider::{DocumentInput, ExtractionProvider};
use std::path::PathBuf;

use crate::output;

pub fn run(
    ocr_file: PathBuf,
    extracted: Vec<PathBuf>,
    output_format: &str,
    page_units: bool,
    config_file: Option<PathBuf>,
) -> Result<(), BidlensError> {
    let config = super::engine_config(config_file.as_deref())?;
    let pages = super::load_transcript(&ocr_file)?;

    let providers: Vec<Box<dyn ExtractionProvider>> = extracted
        .into_iter()
        .map(|path| Box::new(FileProvider::new(path)) as Box<dyn ExtractionProvider>)
        .collect();
    // stored responses ignore the document
    let document = DocumentInput {
        bytes: Vec::new(),
        mime_type: "application/pdf".into(),
    };

    let result =
        bidlens_core::highlight_document(&pages, &providers, &document, config.ocr_scale)?;
    let report = if page_units {
        result.report.to_page_units()
    } else {
        result.report
    };

    match output_format {
        "json" => output::json::print(&report)?,
        _ => output::table::print_report(&report, &result.data, &result.provider),
    }

    Ok(())
}
