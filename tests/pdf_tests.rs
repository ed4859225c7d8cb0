#![cfg(feature = "pdf")]

use billdoc::core::*;
use billdoc::pdf::{self, ExportStatus, Template};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn invoice(items: usize) -> Document {
    let mut b = DocumentBuilder::new(DocumentKind::Invoice, "INV-2024-001", date(2024, 6, 15))
        .deadline(date(2024, 7, 15))
        .currency("EUR")
        .client(Client::new("Müller & Söhne GmbH").address("Hauptstraße 5\n10115 Berlin"))
        .discount_rate(dec!(10))
        .tax_rate(dec!(19))
        .notes("Thank you for your business.")
        .terms("Payable within 30 days.");
    for i in 1..=items {
        b = b.add_item(LineItem::new(
            i.to_string(),
            format!("Development sprint {i}"),
            dec!(5),
            dec!(120),
        ));
    }
    b.build().unwrap()
}

#[test]
fn renders_loadable_pdf_for_every_template() {
    let doc = invoice(3);
    for template in Template::ALL {
        let bytes = pdf::render_pdf(&doc, template).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1, "template {}", template.name());
    }
}

#[test]
fn long_documents_get_more_pages() {
    let bytes = pdf::render_pdf(&invoice(120), Template::Classic).unwrap();
    let parsed = lopdf::Document::load_mem(&bytes).unwrap();
    assert!(parsed.get_pages().len() >= 2);
}

fn shown_strings(bytes: &[u8]) -> Vec<String> {
    let parsed = lopdf::Document::load_mem(bytes).unwrap();
    let mut out = Vec::new();
    for page_id in parsed.get_pages().into_values() {
        let content = lopdf::content::Content::decode(&parsed.get_page_content(page_id).unwrap())
            .unwrap();
        for op in content.operations.iter().filter(|op| op.operator == "Tj") {
            if let Ok(raw) = op.operands[0].as_str() {
                out.push(String::from_utf8_lossy(raw).into_owned());
            }
        }
    }
    out
}

#[test]
fn page_text_contains_number_and_total() {
    let bytes = pdf::render_pdf(&invoice(1), Template::Minimal).unwrap();
    let strings = shown_strings(&bytes);
    assert!(strings.iter().any(|s| s.contains("INV-2024-001")));
    // 600 - 60 = 540, + 19% = 642.60
    assert!(strings.iter().any(|s| s.contains("642.60")));
}

#[test]
fn inconsistent_document_is_refused() {
    let json = serde_json::to_string(&invoice(1))
        .unwrap()
        .replace("\"subtotal\":\"600\"", "\"subtotal\":\"5\"");
    let tampered: Document = serde_json::from_str(&json).unwrap();
    let err = pdf::render_pdf(&tampered, Template::Classic).unwrap_err();
    assert!(matches!(err, DocumentError::Export(_)));
}

#[test]
fn export_reports_status() {
    let dir = tempfile::tempdir().unwrap();
    let doc = invoice(2);

    let ok = pdf::export_to_dir(&doc, Template::Modern, dir.path());
    assert!(ok.is_success());
    assert!(dir.path().join("INV-2024-001.pdf").exists());
    assert!(ok.message().starts_with("Exported INV-2024-001.pdf"));

    let failed = pdf::export_to_dir(&doc, Template::Modern, &dir.path().join("nope"));
    assert!(matches!(failed, ExportStatus::Failed { .. }));
    assert!(failed.message().starts_with("Export failed:"));
}

#[test]
fn file_names_are_sanitized() {
    let doc = DocumentBuilder::new(DocumentKind::Quote, "Q 2024/7", date(2024, 1, 1))
        .build()
        .unwrap();
    assert_eq!(pdf::file_name(&doc), "Q_2024_7.pdf");
}

#[test]
fn template_names_parse() {
    assert_eq!(Template::from_name(" Modern "), Some(Template::Modern));
    assert_eq!(Template::from_name("fancy"), None);
}
