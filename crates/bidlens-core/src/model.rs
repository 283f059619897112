use crate::extraction::schema::ContactField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Corners of an OCR word in raster pixels (origin top-left, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl WordBox {
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrWord {
    pub text: String,
    pub bbox: WordBox,
    pub confidence: f32,
}

/// OCR transcript of one page. `page_index` is 0-based; `width`/`height` are the
/// raster dimensions the words were recognized on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOcrData {
    pub page_index: usize,
    pub words: Vec<OcrWord>,
    pub width: f32,
    pub height: f32,
}

/// Look up a page by its 0-based index. Pages are matched on `page_index`, not on
/// their position in the slice.
pub fn find_page(pages: &[PageOcrData], page_index: usize) -> Option<&PageOcrData> {
    pages.iter().find(|p| p.page_index == page_index)
}

/// Margin added on every side of a matched region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub x: f32,
    pub y: f32,
}

/// Padding around a single matched field word.
pub const FIELD_PADDING: Padding = Padding { x: 4.0, y: 2.0 };

/// Padding around a grouped row region.
pub const REGION_PADDING: Padding = Padding { x: 8.0, y: 4.0 };

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// Box around a single word, grown by `pad` on each side.
    pub fn around(word: &WordBox, pad: Padding) -> Self {
        BoundingBox {
            x: word.x0 - pad.x,
            y: word.y0 - pad.y,
            width: word.width() + 2.0 * pad.x,
            height: word.height() + 2.0 * pad.y,
        }
    }

    /// Union of all word boxes, grown by `pad` on each side. `None` for no words.
    pub fn union<'a, I>(words: I, pad: Padding) -> Option<Self>
    where
        I: IntoIterator<Item = &'a WordBox>,
    {
        let mut iter = words.into_iter();
        let first = *iter.next()?;
        let merged = iter.fold(first, |acc, b| WordBox {
            x0: acc.x0.min(b.x0),
            y0: acc.y0.min(b.y0),
            x1: acc.x1.max(b.x1),
            y1: acc.y1.max(b.y1),
        });
        Some(BoundingBox::around(&merged, pad))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Tag,
    UnitPrice,
    LineTotal,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Tag => write!(f, "tag"),
            FieldType::UnitPrice => write!(f, "unit_price"),
            FieldType::LineTotal => write!(f, "line_total"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldHighlight {
    pub page_index: usize,
    pub bounding_box: BoundingBox,
    pub field_type: FieldType,
}

/// Located fields of one line item. A field type missing from `highlights` was
/// not found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineHighlight {
    pub line_id: u32,
    pub highlights: Vec<FieldHighlight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFieldHighlight {
    pub field_name: ContactField,
    pub page_index: usize,
    pub bounding_box: BoundingBox,
}

/// Line number -> located fields.
pub type LineHighlightMap = BTreeMap<u32, LineHighlight>;

/// Contact field -> located region.
pub type ContactHighlightMap = BTreeMap<ContactField, ContactFieldHighlight>;
