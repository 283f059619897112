//! Matching extracted values back to OCR words.
//!
//! Two entry points: [`field::locate_line_items`] trusts the page each field
//! claims, [`document::locate_in_document`] scans all pages when there is no page
//! to trust. Both are pure functions of their inputs.

pub mod contact;
pub mod document;
pub mod field;
pub mod identifiers;
pub mod matching;
pub mod row;

pub use contact::{locate_contact_field, locate_contact_fields};
pub use document::{find_tag_in_document, locate_in_document, DocumentMatch, ExpectedPrices};
pub use field::{locate_line_item, locate_line_items};
