use crate::extraction::schema::{ContactField, ExtractedBidData, LineItem};
use crate::locate::field::page_index_from_number;
use crate::locate::{locate_contact_fields, locate_line_items};
use crate::model::{find_page, ContactHighlightMap, FieldType, LineHighlightMap, PageOcrData};
use crate::scale::{contact_map_to_page_units, line_map_to_page_units};
use serde::{Deserialize, Serialize};

pub const REPORT_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningReason {
    /// The claimed page is 0 or was not transcribed.
    PageMissing,
    /// The page exists but holds no matching word.
    NotMatched,
    /// The field is never located (e.g. dates).
    NotLocatable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocateWarning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub field: String,
    pub reason: WarningReason,
    pub message: String,
}

/// Everything located for one document, plus what could not be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightReport {
    pub report_schema_version: String,
    /// Scale the boxes are expressed in. 1.0 after [`HighlightReport::to_page_units`].
    pub ocr_scale: f32,
    pub line_highlights: LineHighlightMap,
    pub contact_highlights: ContactHighlightMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<LocateWarning>,
}

impl HighlightReport {
    /// Copy of the report with every box divided by `ocr_scale`.
    pub fn to_page_units(&self) -> HighlightReport {
        HighlightReport {
            report_schema_version: self.report_schema_version.clone(),
            ocr_scale: 1.0,
            line_highlights: line_map_to_page_units(&self.line_highlights, self.ocr_scale),
            contact_highlights: contact_map_to_page_units(&self.contact_highlights, self.ocr_scale),
            warnings: self.warnings.clone(),
        }
    }

    /// Number of located fields across line items and contact fields.
    pub fn located_count(&self) -> usize {
        self.line_highlights
            .values()
            .map(|l| l.highlights.len())
            .sum::<usize>()
            + self.contact_highlights.len()
    }
}

/// Locate every line item and contact field of `data` in `ocr`.
pub fn build_report(ocr: &[PageOcrData], data: &ExtractedBidData, ocr_scale: f32) -> HighlightReport {
    let line_highlights = locate_line_items(&data.line_items, ocr);
    let contact_highlights = locate_contact_fields(data, ocr);

    let mut warnings = Vec::new();
    for item in &data.line_items {
        line_item_warnings(item, ocr, &line_highlights, &mut warnings);
    }
    for (field, value) in data.contact_fields() {
        if value.trim().is_empty() || contact_highlights.contains_key(&field) {
            continue;
        }
        warnings.push(contact_warning(field));
    }

    if !warnings.is_empty() {
        tracing::info!("{} fields could not be located", warnings.len());
    }

    HighlightReport {
        report_schema_version: REPORT_SCHEMA_VERSION.to_string(),
        ocr_scale,
        line_highlights,
        contact_highlights,
        warnings,
    }
}

fn line_item_warnings(
    item: &LineItem,
    ocr: &[PageOcrData],
    located: &LineHighlightMap,
    out: &mut Vec<LocateWarning>,
) {
    let fields = [
        (FieldType::Tag, item.tag_page),
        (FieldType::UnitPrice, item.unit_price_page),
        (FieldType::LineTotal, item.line_total_page),
    ];
    for (field_type, page_number) in fields {
        let found = located
            .get(&item.line)
            .is_some_and(|l| l.highlights.iter().any(|h| h.field_type == field_type));
        if found {
            continue;
        }

        let page_present = page_index_from_number(page_number)
            .and_then(|idx| find_page(ocr, idx))
            .is_some();
        let (reason, message) = if page_present {
            (
                WarningReason::NotMatched,
                format!("line {}: {} not found on page {}", item.line, field_type, page_number),
            )
        } else {
            (
                WarningReason::PageMissing,
                format!("line {}: {} claims page {}, which has no OCR data", item.line, field_type, page_number),
            )
        };
        out.push(LocateWarning {
            line: Some(item.line),
            field: field_type.to_string(),
            reason,
            message,
        });
    }
}

fn contact_warning(field: ContactField) -> LocateWarning {
    let (reason, message) = if field.is_locatable() {
        (WarningReason::NotMatched, format!("{field} not found in document"))
    } else {
        (WarningReason::NotLocatable, format!("{field} is not located"))
    };
    LocateWarning {
        line: None,
        field: field.name().to_string(),
        reason,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::schema::{ReceiverInfo, Summary, VendorInfo};
    use crate::model::{OcrWord, WordBox};
    use rust_decimal_macros::dec;

    fn word(text: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> OcrWord {
        OcrWord {
            text: text.into(),
            bbox: WordBox { x0, y0, x1, y1 },
            confidence: 90.0,
        }
    }

    fn page() -> PageOcrData {
        PageOcrData {
            page_index: 0,
            words: vec![
                word("Acme", 50.0, 60.0, 110.0, 80.0),
                word("Supply", 115.0, 60.0, 190.0, 80.0),
                word("TK-5031", 100.0, 300.0, 190.0, 320.0),
                word("$1,234.00", 600.0, 302.0, 680.0, 320.0),
                word("$2,468.00", 800.0, 302.0, 880.0, 320.0),
            ],
            width: 1224.0,
            height: 1584.0,
        }
    }

    fn data() -> ExtractedBidData {
        ExtractedBidData {
            vendor_info: VendorInfo {
                vendor_name: "Acme Supply".into(),
                quote_date: "2024-03-01".into(),
                supplier_phone: "713-555-0199".into(),
                ..VendorInfo::default()
            },
            receiver_info: ReceiverInfo::default(),
            line_items: vec![
                LineItem {
                    line: 1,
                    tag: "TK-5031".into(),
                    tag_page: 1,
                    description: String::new(),
                    unit_price: dec!(1234.00),
                    unit_price_page: 1,
                    qty: 2,
                    line_total: dec!(2468.00),
                    line_total_page: 1,
                },
                LineItem {
                    line: 2,
                    tag: "PV-9000".into(),
                    tag_page: 3,
                    description: String::new(),
                    unit_price: dec!(10),
                    unit_price_page: 1,
                    qty: 1,
                    line_total: dec!(10),
                    line_total_page: 1,
                },
            ],
            summary: Summary::default(),
        }
    }

    #[test]
    fn test_report_collects_highlights_and_warnings() {
        let report = build_report(&[page()], &data(), 2.0);
        assert_eq!(report.report_schema_version, REPORT_SCHEMA_VERSION);
        assert_eq!(report.line_highlights[&1].highlights.len(), 3);
        assert!(!report.line_highlights.contains_key(&2));
        assert!(report.contact_highlights.contains_key(&ContactField::VendorName));

        let line2: Vec<_> = report.warnings.iter().filter(|w| w.line == Some(2)).collect();
        assert_eq!(line2.len(), 3);
        assert_eq!(line2[0].reason, WarningReason::PageMissing);
        assert_eq!(line2[1].reason, WarningReason::NotMatched);

        let date = report
            .warnings
            .iter()
            .find(|w| w.field == "quote_date")
            .unwrap();
        assert_eq!(date.reason, WarningReason::NotLocatable);

        let phone = report
            .warnings
            .iter()
            .find(|w| w.field == "supplier_phone")
            .unwrap();
        assert_eq!(phone.reason, WarningReason::NotMatched);

        // blank contact fields are not reported
        assert!(!report.warnings.iter().any(|w| w.field == "receiver_name"));
    }

    #[test]
    fn test_to_page_units() {
        let report = build_report(&[page()], &data(), 2.0);
        let units = report.to_page_units();
        assert_eq!(units.ocr_scale, 1.0);
        let raster = report.line_highlights[&1].highlights[0].bounding_box;
        let scaled = units.line_highlights[&1].highlights[0].bounding_box;
        assert_eq!(scaled.x, raster.x / 2.0);
        assert_eq!(units.located_count(), report.located_count());
    }

    #[test]
    fn test_report_json_keys() {
        let report = build_report(&[page()], &data(), 2.0);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["line_highlights"]["1"]["highlights"][0]["boundingBox"].is_object());
        assert_eq!(json["line_highlights"]["1"]["highlights"][0]["fieldType"], "tag");
        assert_eq!(json["contact_highlights"]["vendor_name"]["pageIndex"], 0);
    }
}
