use crate::model::OcrWord;

/// Half-height of the band, as a fraction of page height, that counts as the
/// anchor's text line.
pub const ROW_BAND_FRACTION: f32 = 0.04;

/// Wider band used when pulling expected prices into an anchor's row.
pub const PRICE_BAND_FRACTION: f32 = 0.05;

/// Words whose vertical center lies strictly within `band` pixels of the anchor's.
pub fn words_in_band<'a>(anchor: &OcrWord, words: &'a [OcrWord], band: f32) -> Vec<&'a OcrWord> {
    let anchor_y = anchor.bbox.center_y();
    words
        .iter()
        .filter(|w| (w.bbox.center_y() - anchor_y).abs() < band)
        .collect()
}

/// Words sharing the anchor's visual line: vertical centers within 4% of the page
/// height. The anchor itself is included when it is part of `words`.
pub fn same_line<'a>(anchor: &OcrWord, words: &'a [OcrWord], page_height: f32) -> Vec<&'a OcrWord> {
    words_in_band(anchor, words, page_height * ROW_BAND_FRACTION)
}
