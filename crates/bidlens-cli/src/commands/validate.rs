use bidlens_core::error::BidlensError;
use bidlens_core::extraction::{consistency_warnings, load_bid_data};
use std::path::Path;

pub fn validate(file: &Path) -> Result<(), BidlensError> {
    let data = load_bid_data(file)?;

    println!(
        "Extraction response is valid: {} ({})",
        non_empty(&data.vendor_info.vendor_name),
        non_empty(&data.vendor_info.quote_id)
    );
    println!("  Line items: {}", data.line_items.len());
    println!(
        "  Grand total: {} {}",
        data.summary.grand_total, data.summary.currency
    );

    let warnings = consistency_warnings(&data);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

fn non_empty(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}
