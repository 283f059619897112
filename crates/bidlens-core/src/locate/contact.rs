use crate::extraction::schema::{ContactField, ExtractedBidData};
use crate::locate::document::locate_in_document;
use crate::locate::identifiers::contact_identifiers;
use crate::model::{ContactFieldHighlight, ContactHighlightMap, PageOcrData};

/// Locate one vendor/receiver field by its value alone.
///
/// Returns `None` for fields that are not locatable, blank values, or values with
/// no token found anywhere in the document.
pub fn locate_contact_field(
    field: ContactField,
    value: &str,
    pages: &[PageOcrData],
) -> Option<ContactFieldHighlight> {
    if !field.is_locatable() {
        return None;
    }
    let identifiers = contact_identifiers(value);
    let found = locate_in_document(&identifiers, pages, None)?;
    Some(ContactFieldHighlight {
        field_name: field,
        page_index: found.page_index,
        bounding_box: found.bounding_box,
    })
}

/// Locate every vendor and receiver field. Fields that cannot be located are
/// absent from the result.
pub fn locate_contact_fields(data: &ExtractedBidData, pages: &[PageOcrData]) -> ContactHighlightMap {
    let mut map = ContactHighlightMap::new();
    for (field, value) in data.contact_fields() {
        if let Some(highlight) = locate_contact_field(field, value, pages) {
            map.insert(field, highlight);
        }
    }
    tracing::info!("located {} contact fields", map.len());
    map
}
