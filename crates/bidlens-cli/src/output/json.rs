use bidlens_core::error::BidlensError;
use bidlens_core::report::HighlightReport;

pub fn print(report: &HighlightReport) -> Result<(), BidlensError> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}
