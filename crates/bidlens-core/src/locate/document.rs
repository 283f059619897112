use crate::locate::identifiers::extract_identifiers;
use crate::locate::matching::{matches_identifier, matches_price};
use crate::locate::row::{same_line, words_in_band, PRICE_BAND_FRACTION};
use crate::model::{BoundingBox, OcrWord, PageOcrData, REGION_PADDING};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Prices expected on the anchor's row. Zero or absent prices are not searched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExpectedPrices {
    pub unit_price: Option<Decimal>,
    pub line_total: Option<Decimal>,
}

impl ExpectedPrices {
    fn matches(&self, word: &str) -> bool {
        [self.unit_price, self.line_total]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_zero())
            .any(|p| matches_price(word, p))
    }
}

/// A region found without a page hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMatch {
    pub page_index: usize,
    pub bounding_box: BoundingBox,
}

/// Search every page, lowest `page_index` first, for the first word matching one
/// of `identifiers` (tried in order on each page). The first page with any match
/// wins; later pages are not examined.
///
/// The result covers the anchor's whole text line plus, when `prices` is given,
/// any word within the wider price band that holds one of the expected prices.
pub fn locate_in_document(
    identifiers: &[String],
    pages: &[PageOcrData],
    prices: Option<&ExpectedPrices>,
) -> Option<DocumentMatch> {
    if identifiers.is_empty() {
        return None;
    }

    let mut ordered: Vec<&PageOcrData> = pages.iter().collect();
    ordered.sort_by_key(|p| p.page_index);

    for page in ordered {
        let Some((anchor, identifier)) = find_anchor(identifiers, &page.words) else {
            continue;
        };
        tracing::debug!(
            page = page.page_index + 1,
            word = %anchor.text,
            identifier = %identifier,
            "anchor found"
        );

        let mut group = same_line(anchor, &page.words, page.height);
        if group.is_empty() {
            // zero-height page: the band is empty but the anchor still counts
            group.push(anchor);
        }

        if let Some(prices) = prices {
            let band = page.height * PRICE_BAND_FRACTION;
            for word in words_in_band(anchor, &page.words, band) {
                if prices.matches(&word.text) && !group.iter().any(|g| std::ptr::eq(*g, word)) {
                    group.push(word);
                }
            }
        }

        let bounding_box = BoundingBox::union(group.iter().copied().map(|w| &w.bbox), REGION_PADDING);
        return bounding_box.map(|bounding_box| DocumentMatch {
            page_index: page.page_index,
            bounding_box,
        });
    }

    tracing::debug!("no match for {:?} in {} pages", identifiers, pages.len());
    None
}

/// Whole-document lookup for an equipment tag.
pub fn find_tag_in_document(
    tag: &str,
    pages: &[PageOcrData],
    prices: Option<&ExpectedPrices>,
) -> Option<DocumentMatch> {
    locate_in_document(&extract_identifiers(tag), pages, prices)
}

fn find_anchor<'a, 'i>(
    identifiers: &'i [String],
    words: &'a [OcrWord],
) -> Option<(&'a OcrWord, &'i str)> {
    identifiers.iter().find_map(|id| {
        words
            .iter()
            .find(|w| matches_identifier(&w.text, id))
            .map(|w| (w, id.as_str()))
    })
}
