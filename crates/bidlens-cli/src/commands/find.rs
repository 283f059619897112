use bidlens_core::error::BidlensError;
use bidlens_core::locate::matching::parse_price_token;
use bidlens_core::locate::{find_tag_in_document, ExpectedPrices};
use std::path::PathBuf;

pub fn run(
    text: &str,
    ocr_file: PathBuf,
    unit_price: Option<&str>,
    line_total: Option<&str>,
) -> Result<(), BidlensError> {
    let pages = super::load_transcript(&ocr_file)?;

    let parse = |s: &str| parse_price_token(s).ok_or_else(|| BidlensError::InvalidPrice(s.into()));
    let prices = ExpectedPrices {
        unit_price: unit_price.map(parse).transpose()?,
        line_total: line_total.map(parse).transpose()?,
    };
    let prices = (prices != ExpectedPrices::default()).then_some(&prices);

    match find_tag_in_document(text, &pages, prices) {
        Some(found) => {
            let b = found.bounding_box;
            println!(
                "page {}: x={:.1} y={:.1} w={:.1} h={:.1}",
                found.page_index + 1,
                b.x,
                b.y,
                b.width,
                b.height
            );
        }
        None => println!("'{text}' not found in {} page(s)", pages.len()),
    }

    Ok(())
}
