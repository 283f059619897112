use bidlens_core::config::validate_config;
use bidlens_core::error::BidlensError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn run(
    pdf_file: PathBuf,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    scale: Option<f32>,
    max_pages: Option<usize>,
) -> Result<(), BidlensError> {
    let mut config = super::engine_config(config_file.as_deref())?;
    if let Some(scale) = scale {
        config.ocr_scale = scale;
        validate_config(&config)?;
    }

    let pdf_bytes = std::fs::read(&pdf_file)?;
    let abort = AtomicBool::new(false);
    let pages = bidlens_core::transcribe_pdf(
        &pdf_bytes,
        &config,
        |progress| {
            eprintln!("{}", progress.status);
            if max_pages.is_some_and(|n| progress.current_page >= n) {
                abort.store(true, Ordering::Relaxed);
            }
        },
        &abort,
    )?;

    let json = serde_json::to_string_pretty(&pages)?;
    match output_file {
        Some(path) => {
            std::fs::write(&path, json)?;
            let words: usize = pages.iter().map(|p| p.words.len()).sum();
            eprintln!(
                "Transcribed {} page(s), {} word(s), written to {}",
                pages.len(),
                words,
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
