use bidlens_core::extraction::schema::ExtractedBidData;
use bidlens_core::model::{BoundingBox, FieldType, LineHighlight};
use bidlens_core::report::HighlightReport;

pub fn print_report(report: &HighlightReport, data: &ExtractedBidData, provider: &str) {
    let units = if report.ocr_scale == 1.0 {
        "page units".to_string()
    } else {
        format!("raster px @ scale {}", report.ocr_scale)
    };
    println!("=== Highlights ({}; data from {}) ===\n", units, provider);

    if data.line_items.is_empty() {
        println!("  (no line items)\n");
    } else {
        let tag_width = data
            .line_items
            .iter()
            .map(|i| i.tag.len())
            .max()
            .unwrap_or(3)
            .max(3);

        println!(
            "  {:>4}  {:<tag_width$}  {:<24}  {:<24}  {:<24}",
            "Line", "Tag", "Tag box", "Unit price box", "Line total box"
        );
        for item in &data.line_items {
            let located = report.line_highlights.get(&item.line);
            println!(
                "  {:>4}  {:<tag_width$}  {:<24}  {:<24}  {:<24}",
                item.line,
                item.tag,
                cell(located, FieldType::Tag),
                cell(located, FieldType::UnitPrice),
                cell(located, FieldType::LineTotal),
            );
        }
        println!();
    }

    if !report.contact_highlights.is_empty() {
        println!("  Contact fields:");
        for (field, h) in &report.contact_highlights {
            println!(
                "    {:<18} {}  \"{}\"",
                field.name(),
                format_box(h.page_index, &h.bounding_box),
                data.contact_value(*field)
            );
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("  Not located:");
        for w in &report.warnings {
            println!("    - {}", w.message);
        }
        println!();
    }

    println!("  {} field(s) located", report.located_count());
}

fn cell(located: Option<&LineHighlight>, field_type: FieldType) -> String {
    located
        .and_then(|l| l.highlights.iter().find(|h| h.field_type == field_type))
        .map(|h| format_box(h.page_index, &h.bounding_box))
        .unwrap_or_else(|| "-".into())
}

fn format_box(page_index: usize, b: &BoundingBox) -> String {
    format!(
        "p{} {:.0},{:.0} {:.0}x{:.0}",
        page_index + 1,
        b.x,
        b.y,
        b.width,
        b.height
    )
}
