use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured bid data as returned by an extraction provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedBidData {
    pub vendor_info: VendorInfo,
    pub receiver_info: ReceiverInfo,
    pub line_items: Vec<LineItem>,
    pub summary: Summary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorInfo {
    pub vendor_name: String,
    pub quote_id: String,
    pub quote_date: String,
    pub terms: String,
    pub supplier_address: String,
    pub supplier_phone: String,
    pub supplier_email: String,
    pub supplier_fax: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverInfo {
    pub receiver_name: String,
    pub receiver_address: String,
    pub receiver_phone: String,
    pub receiver_email: String,
    pub receiver_fax: String,
}

/// One priced line of the bid. The `*_page` fields are 1-based page numbers as
/// claimed by the extraction provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub line: u32,
    pub tag: String,
    pub tag_page: u32,
    #[serde(default)]
    pub description: String,
    pub unit_price: Decimal,
    pub unit_price_page: u32,
    pub qty: u32,
    pub line_total: Decimal,
    pub line_total_page: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_items: u32,
    pub grand_total: Decimal,
    pub currency: String,
}

/// Free-text vendor and receiver fields that can be searched for on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    VendorName,
    QuoteId,
    QuoteDate,
    Terms,
    SupplierAddress,
    SupplierPhone,
    SupplierEmail,
    SupplierFax,
    ReceiverName,
    ReceiverAddress,
    ReceiverPhone,
    ReceiverEmail,
    ReceiverFax,
}

impl ContactField {
    pub const ALL: [ContactField; 13] = [
        ContactField::VendorName,
        ContactField::QuoteId,
        ContactField::QuoteDate,
        ContactField::Terms,
        ContactField::SupplierAddress,
        ContactField::SupplierPhone,
        ContactField::SupplierEmail,
        ContactField::SupplierFax,
        ContactField::ReceiverName,
        ContactField::ReceiverAddress,
        ContactField::ReceiverPhone,
        ContactField::ReceiverEmail,
        ContactField::ReceiverFax,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ContactField::VendorName => "vendor_name",
            ContactField::QuoteId => "quote_id",
            ContactField::QuoteDate => "quote_date",
            ContactField::Terms => "terms",
            ContactField::SupplierAddress => "supplier_address",
            ContactField::SupplierPhone => "supplier_phone",
            ContactField::SupplierEmail => "supplier_email",
            ContactField::SupplierFax => "supplier_fax",
            ContactField::ReceiverName => "receiver_name",
            ContactField::ReceiverAddress => "receiver_address",
            ContactField::ReceiverPhone => "receiver_phone",
            ContactField::ReceiverEmail => "receiver_email",
            ContactField::ReceiverFax => "receiver_fax",
        }
    }

    pub fn from_name(name: &str) -> Option<ContactField> {
        ContactField::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Whether this field is worth searching for on the page.
    ///
    /// Dates are normalized to `YYYY-MM-DD` by the provider and rarely appear in
    /// that form in the document, so they are not located.
    pub fn is_locatable(self) -> bool {
        !matches!(self, ContactField::QuoteDate)
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ExtractedBidData {
    /// The value currently held by a contact field.
    pub fn contact_value(&self, field: ContactField) -> &str {
        let v = &self.vendor_info;
        let r = &self.receiver_info;
        match field {
            ContactField::VendorName => &v.vendor_name,
            ContactField::QuoteId => &v.quote_id,
            ContactField::QuoteDate => &v.quote_date,
            ContactField::Terms => &v.terms,
            ContactField::SupplierAddress => &v.supplier_address,
            ContactField::SupplierPhone => &v.supplier_phone,
            ContactField::SupplierEmail => &v.supplier_email,
            ContactField::SupplierFax => &v.supplier_fax,
            ContactField::ReceiverName => &r.receiver_name,
            ContactField::ReceiverAddress => &r.receiver_address,
            ContactField::ReceiverPhone => &r.receiver_phone,
            ContactField::ReceiverEmail => &r.receiver_email,
            ContactField::ReceiverFax => &r.receiver_fax,
        }
    }

    /// All contact fields paired with their values, in declaration order.
    pub fn contact_fields(&self) -> Vec<(ContactField, &str)> {
        ContactField::ALL
            .into_iter()
            .map(|f| (f, self.contact_value(f)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_field_names_round_trip() {
        for f in ContactField::ALL {
            assert_eq!(ContactField::from_name(f.name()), Some(f));
        }
        assert_eq!(ContactField::from_name("nope"), None);
    }

    #[test]
    fn test_contact_field_serializes_as_name() {
        let json = serde_json::to_string(&ContactField::SupplierPhone).unwrap();
        assert_eq!(json, "\"supplier_phone\"");
    }

    #[test]
    fn test_quote_date_is_not_locatable() {
        assert!(!ContactField::QuoteDate.is_locatable());
        assert!(ContactField::SupplierEmail.is_locatable());
    }
}
