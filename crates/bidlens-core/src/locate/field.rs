use crate::extraction::schema::LineItem;
use crate::locate::identifiers::extract_identifiers;
use crate::locate::matching::{matches_identifier, matches_price};
use crate::model::{
    find_page, BoundingBox, FieldHighlight, FieldType, LineHighlight, LineHighlightMap,
    PageOcrData, FIELD_PADDING,
};
use rust_decimal::Decimal;

/// Convert a 1-based page number from the extraction provider to a 0-based OCR
/// page index. Page number 0 has no counterpart.
pub fn page_index_from_number(page_number: u32) -> Option<usize> {
    page_number.checked_sub(1).map(|i| i as usize)
}

/// Resolve the page a field claims to be on.
fn claimed_page(pages: &[PageOcrData], page_number: u32) -> Option<&PageOcrData> {
    find_page(pages, page_index_from_number(page_number)?)
}

/// Box of the first word on `page` matching any tag candidate, trying candidates
/// in order.
pub fn find_tag_on_page(tag: &str, page: &PageOcrData) -> Option<BoundingBox> {
    extract_identifiers(tag).iter().find_map(|id| {
        page.words
            .iter()
            .find(|w| matches_identifier(&w.text, id))
            .map(|w| BoundingBox::around(&w.bbox, FIELD_PADDING))
    })
}

/// Box of the first word on `page`, in reading order, holding `price`.
pub fn find_price_on_page(price: Decimal, page: &PageOcrData) -> Option<BoundingBox> {
    page.words
        .iter()
        .find(|w| matches_price(&w.text, price))
        .map(|w| BoundingBox::around(&w.bbox, FIELD_PADDING))
}

/// Locate a line item's tag, unit price and line total, each on the page the
/// provider claimed for it.
///
/// Fields whose page is missing from `pages`, or whose value is not found there,
/// are left out. A wrong page claim is not retried on other pages.
pub fn locate_line_item(item: &LineItem, pages: &[PageOcrData]) -> Vec<FieldHighlight> {
    let mut highlights = Vec::with_capacity(3);

    if let Some(page) = claimed_page(pages, item.tag_page) {
        if let Some(bounding_box) = find_tag_on_page(&item.tag, page) {
            highlights.push(FieldHighlight {
                page_index: page.page_index,
                bounding_box,
                field_type: FieldType::Tag,
            });
        }
    }

    let prices = [
        (FieldType::UnitPrice, item.unit_price, item.unit_price_page),
        (FieldType::LineTotal, item.line_total, item.line_total_page),
    ];
    for (field_type, price, page_number) in prices {
        let Some(page) = claimed_page(pages, page_number) else {
            continue;
        };
        if let Some(bounding_box) = find_price_on_page(price, page) {
            highlights.push(FieldHighlight {
                page_index: page.page_index,
                bounding_box,
                field_type,
            });
        }
    }

    tracing::debug!(
        line = item.line,
        tag = %item.tag,
        found = highlights.len(),
        "located line item fields"
    );

    highlights
}

/// Locate every line item. Lines with no located field get no entry.
pub fn locate_line_items(items: &[LineItem], pages: &[PageOcrData]) -> LineHighlightMap {
    let mut map = LineHighlightMap::new();
    if pages.is_empty() {
        return map;
    }

    for item in items {
        let highlights = locate_line_item(item, pages);
        if !highlights.is_empty() {
            map.insert(
                item.line,
                LineHighlight {
                    line_id: item.line,
                    highlights,
                },
            );
        }
    }

    tracing::info!(
        "located fields for {} of {} line items",
        map.len(),
        items.len()
    );
    map
}
