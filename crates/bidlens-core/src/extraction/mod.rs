pub mod file;
pub mod provider;
pub mod repair;
pub mod schema;

use crate::error::BidlensError;
use repair::repair_json;
use rust_decimal::Decimal;
use schema::ExtractedBidData;
use std::collections::BTreeSet;
use std::path::Path;

/// Load and validate an extraction response stored on disk.
pub fn load_bid_data(path: &Path) -> Result<ExtractedBidData, BidlensError> {
    let raw = std::fs::read_to_string(path)?;
    parse_bid_data(&raw)
}

/// Parse a raw provider response into bid data.
///
/// The text is repaired first (see [`repair_json`]); shape errors are reported as
/// schema validation failures.
pub fn parse_bid_data(raw: &str) -> Result<ExtractedBidData, BidlensError> {
    let repaired = repair_json(raw)?;
    let data: ExtractedBidData = serde_json::from_str(&repaired)
        .map_err(|e| BidlensError::SchemaValidation(e.to_string()))?;
    validate_bid_data(&data)?;
    Ok(data)
}

/// Validate that bid data is usable for highlighting.
pub fn validate_bid_data(data: &ExtractedBidData) -> Result<(), BidlensError> {
    let mut seen = BTreeSet::new();
    for item in &data.line_items {
        if !seen.insert(item.line) {
            return Err(BidlensError::SchemaValidation(format!(
                "duplicate line number {}",
                item.line
            )));
        }
    }
    Ok(())
}

/// Non-fatal inconsistencies worth showing to a reviewer: arithmetic that does not
/// add up and page claims that can never be located.
pub fn consistency_warnings(data: &ExtractedBidData) -> Vec<String> {
    let mut warnings = Vec::new();

    for item in &data.line_items {
        match item.unit_price.checked_mul(Decimal::from(item.qty)) {
            Some(expected) if expected != item.line_total => warnings.push(format!(
                "line {}: {} x {} = {}, but line total is {}",
                item.line, item.qty, item.unit_price, expected, item.line_total
            )),
            Some(_) => {}
            None => warnings.push(format!(
                "line {}: arithmetic overflow computing {} x {}",
                item.line, item.qty, item.unit_price
            )),
        }
        for (field, page) in [
            ("tag_page", item.tag_page),
            ("unit_price_page", item.unit_price_page),
            ("line_total_page", item.line_total_page),
        ] {
            if page == 0 {
                warnings.push(format!("line {}: {field} is 0 (pages start at 1)", item.line));
            }
        }
    }

    let sum = data
        .line_items
        .iter()
        .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.line_total));
    match sum {
        Some(sum) if sum != data.summary.grand_total => warnings.push(format!(
            "line totals sum to {}, but grand total is {}",
            sum, data.summary.grand_total
        )),
        Some(_) => {}
        None => warnings.push("arithmetic overflow summing line totals".into()),
    }
    if data.summary.total_items as usize != data.line_items.len() {
        warnings.push(format!(
            "summary lists {} items, but {} line items were extracted",
            data.summary.total_items,
            data.line_items.len()
        ));
    }

    warnings
}
