use lopdf::content::{Content, Operation};
use lopdf::{Document as PdfDocument, Object, ObjectId, Stream, dictionary};
use tracing::debug;

use super::Template;
use super::layout::{self, PAGE_HEIGHT, PAGE_WIDTH, Page};
use crate::core::{Document, DocumentError, validate_arithmetic};

/// Render a document to PDF bytes.
///
/// The document must be arithmetically consistent; a document whose
/// derived fields disagree with its items is refused rather than printed.
pub fn render_pdf(doc: &Document, template: Template) -> Result<Vec<u8>, DocumentError> {
    let errors = validate_arithmetic(doc);
    if !errors.is_empty() {
        let msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(DocumentError::Export(format!(
            "document {} is inconsistent: {msg}",
            doc.number
        )));
    }

    let pages = layout::layout(doc, template);
    let mut pdf = PdfDocument::with_version("1.7");

    let pages_id = pdf.new_object_id();
    let regular_id = pdf.add_object(font("Helvetica"));
    let bold_id = pdf.add_object(font("Helvetica-Bold"));
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(regular_id),
            "F2" => Object::Reference(bold_id),
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for page in &pages {
        let content = page_content(page)
            .encode()
            .map_err(|e| DocumentError::Export(format!("failed to encode page content: {e}")))?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources_id),
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    pdf.trailer.set("Root", Object::Reference(catalog_id));
    set_info(&mut pdf, doc);
    pdf.compress();

    let mut output = Vec::new();
    pdf.save_to(&mut output)
        .map_err(|e| DocumentError::Export(format!("failed to save PDF: {e}")))?;

    debug!(document = %doc.number, pages = pages.len(), bytes = output.len(), "PDF rendered");
    Ok(output)
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn set_info(pdf: &mut PdfDocument, doc: &Document) {
    let title = format!("{} {}", doc.kind().label(), doc.number);
    let info_id: ObjectId = pdf.add_object(dictionary! {
        "Title" => Object::string_literal(win_ansi(&title)),
        "Producer" => Object::string_literal("billdoc"),
    });
    pdf.trailer.set("Info", Object::Reference(info_id));
}

fn page_content(page: &Page) -> Content {
    let mut ops = Vec::new();

    for rect in &page.rects {
        let (r, g, b) = rect.color;
        ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        ops.push(Operation::new(
            "re",
            vec![
                rect.x.into(),
                rect.y.into(),
                rect.width.into(),
                rect.height.into(),
            ],
        ));
        ops.push(Operation::new("f", vec![]));
    }

    for run in &page.runs {
        let (r, g, b) = run.color;
        let font = if run.bold { "F2" } else { "F1" };
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        ops.push(Operation::new("Tf", vec![font.into(), run.size.into()]));
        ops.push(Operation::new("Td", vec![run.x.into(), run.y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi(&run.text))],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    Content { operations: ops }
}

/// Encode text for the standard fonts' WinAnsi encoding.
/// Characters outside it become `?`.
pub(crate) fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '€' => 0x80,
            '–' => 0x96,
            '—' => 0x97,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ansi_maps_currency_symbols() {
        assert_eq!(win_ansi("€5"), vec![0x80, b'5']);
        assert_eq!(win_ansi("£"), vec![0xA3]);
        assert_eq!(win_ansi("¥"), vec![0xA5]);
        assert_eq!(win_ansi("₹"), vec![b'?']);
        assert_eq!(win_ansi("Müller"), vec![b'M', 0xFC, b'l', b'l', b'e', b'r']);
    }
}
