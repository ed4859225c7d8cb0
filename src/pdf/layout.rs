//! Page layout: turns a document into positioned text runs and shapes.
//!
//! Kept separate from the PDF object writing so the layout can be tested
//! without parsing PDF output.

use rust_decimal::Decimal;

use super::Template;
use crate::core::{Document, DocumentKind, format_amount, format_rate};

pub(crate) const PAGE_WIDTH: f32 = 595.0;
pub(crate) const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const RIGHT: f32 = PAGE_WIDTH - MARGIN;
const BOTTOM: f32 = 70.0;
const ROW_HEIGHT: f32 = 16.0;
const BODY_SIZE: f32 = 10.0;

const COL_QTY: f32 = 360.0;
const COL_PRICE: f32 = 450.0;
const DESCRIPTION_CHARS: usize = 52;
const WRAP_CHARS: usize = 95;

pub(crate) type Rgb = (f32, f32, f32);

const BLACK: Rgb = (0.0, 0.0, 0.0);
const WHITE: Rgb = (1.0, 1.0, 1.0);
const GRAY: Rgb = (0.45, 0.45, 0.45);
const ACCENT: Rgb = (0.12, 0.23, 0.37);

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextRun {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
    pub color: Rgb,
    pub text: String,
}

/// Filled rectangle; a rule is a rectangle one point high.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Page {
    pub rects: Vec<Rect>,
    pub runs: Vec<TextRun>,
}

/// Approximate Helvetica advance width; digits are 0.556 em.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.556
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

struct Cursor {
    template: Template,
    pages: Vec<Page>,
    y: f32,
}

impl Cursor {
    fn page(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn text(&mut self, x: f32, size: f32, bold: bool, color: Rgb, text: impl Into<String>) {
        let y = self.y;
        self.page().runs.push(TextRun {
            x,
            y,
            size,
            bold,
            color,
            text: text.into(),
        });
    }

    fn text_right(&mut self, right: f32, size: f32, bold: bool, text: impl Into<String>) {
        let text = text.into();
        let x = right - text_width(&text, size);
        self.text(x, size, bold, BLACK, text);
    }

    fn rule(&mut self) {
        if self.template == Template::Minimal {
            return;
        }
        let y = self.y;
        self.page().rects.push(Rect {
            x: MARGIN,
            y,
            width: RIGHT - MARGIN,
            height: 0.75,
            color: GRAY,
        });
    }

    /// Start a new page when fewer than `needed` points remain.
    fn ensure(&mut self, needed: f32) -> bool {
        if self.y - needed < BOTTOM {
            self.pages.push(Page::default());
            self.y = PAGE_HEIGHT - MARGIN;
            true
        } else {
            false
        }
    }
}

/// Lay the document out over as many pages as its items need.
pub(crate) fn layout(doc: &Document, template: Template) -> Vec<Page> {
    let mut c = Cursor {
        template,
        pages: vec![Page::default()],
        y: PAGE_HEIGHT - MARGIN,
    };

    header(&mut c, doc);
    client_block(&mut c, doc);
    table(&mut c, doc);
    totals(&mut c, doc);
    footer(&mut c, doc);

    let count = c.pages.len();
    if count > 1 {
        for (i, page) in c.pages.iter_mut().enumerate() {
            let label = format!("Page {} of {}", i + 1, count);
            page.runs.push(TextRun {
                x: RIGHT - text_width(&label, 8.0),
                y: BOTTOM - 30.0,
                size: 8.0,
                bold: false,
                color: GRAY,
                text: label,
            });
        }
    }
    c.pages
}

fn heading(template: Template, kind: DocumentKind) -> String {
    match template {
        Template::Classic => kind.label().to_ascii_uppercase(),
        Template::Modern | Template::Minimal => kind.label().to_string(),
    }
}

fn header(c: &mut Cursor, doc: &Document) {
    let title = heading(c.template, doc.kind());
    match c.template {
        Template::Classic => {
            c.text(MARGIN, 22.0, true, BLACK, title);
        }
        Template::Modern => {
            c.page().rects.push(Rect {
                x: 0.0,
                y: PAGE_HEIGHT - 90.0,
                width: PAGE_WIDTH,
                height: 90.0,
                color: ACCENT,
            });
            c.y -= 5.0;
            c.text(MARGIN, 24.0, true, WHITE, title);
            c.y -= 40.0;
        }
        Template::Minimal => {
            c.text(MARGIN, 14.0, false, GRAY, title);
        }
    }

    c.y -= 28.0;
    let mut meta = vec![
        ("Number", doc.number.clone()),
        ("Date", doc.date.format("%Y-%m-%d").to_string()),
    ];
    match doc.kind() {
        DocumentKind::Invoice => {
            if let Some(due) = doc.due_date() {
                meta.push(("Due date", due.format("%Y-%m-%d").to_string()));
            }
        }
        DocumentKind::Quote => {
            if let Some(until) = doc.valid_until() {
                meta.push(("Valid until", until.format("%Y-%m-%d").to_string()));
            }
        }
    }
    meta.push(("Status", doc.status().label().to_string()));
    if let Some(category) = &doc.category {
        meta.push(("Category", category.clone()));
    }

    for (label, value) in meta {
        c.text(MARGIN, BODY_SIZE, true, BLACK, format!("{label}:"));
        c.text(MARGIN + 80.0, BODY_SIZE, false, BLACK, value);
        c.y -= 14.0;
    }
    c.y -= 10.0;
}

fn client_block(c: &mut Cursor, doc: &Document) {
    let Some(client) = &doc.client else {
        return;
    };
    let label = match doc.kind() {
        DocumentKind::Invoice => "Bill to",
        DocumentKind::Quote => "Prepared for",
    };
    c.text(MARGIN, BODY_SIZE, true, GRAY, label);
    c.y -= 14.0;
    c.text(MARGIN, 11.0, true, BLACK, client.name.clone());
    c.y -= 14.0;
    if let Some(email) = &client.email {
        c.text(MARGIN, BODY_SIZE, false, BLACK, email.clone());
        c.y -= 14.0;
    }
    if let Some(address) = &client.address {
        for line in address.lines().filter(|l| !l.trim().is_empty()) {
            c.text(MARGIN, BODY_SIZE, false, BLACK, line.trim().to_string());
            c.y -= 14.0;
        }
    }
    c.y -= 12.0;
}

fn table_header(c: &mut Cursor) {
    c.text(MARGIN, BODY_SIZE, true, BLACK, "Description");
    c.text_right(COL_QTY, BODY_SIZE, true, "Qty");
    c.text_right(COL_PRICE, BODY_SIZE, true, "Unit price");
    c.text_right(RIGHT, BODY_SIZE, true, "Amount");
    c.y -= 6.0;
    c.rule();
    c.y -= ROW_HEIGHT;
}

fn table(c: &mut Cursor, doc: &Document) {
    c.ensure(3.0 * ROW_HEIGHT);
    table_header(c);
    for item in doc.items() {
        if c.ensure(ROW_HEIGHT) {
            table_header(c);
        }
        let description = if item.description().trim().is_empty() {
            "-".to_string()
        } else {
            truncate(item.description().trim(), DESCRIPTION_CHARS)
        };
        c.text(MARGIN, BODY_SIZE, false, BLACK, description);
        c.text_right(COL_QTY, BODY_SIZE, false, item.quantity().normalize().to_string());
        c.text_right(
            COL_PRICE,
            BODY_SIZE,
            false,
            format_amount(item.unit_price(), &doc.currency_code),
        );
        c.text_right(
            RIGHT,
            BODY_SIZE,
            false,
            format_amount(item.total(), &doc.currency_code),
        );
        c.y -= ROW_HEIGHT;
    }
    c.y += ROW_HEIGHT - 6.0;
    c.rule();
    c.y -= ROW_HEIGHT;
}

fn totals(c: &mut Cursor, doc: &Document) {
    c.ensure(5.0 * ROW_HEIGHT);
    let t = doc.totals().rounded();
    let currency = doc.currency_code.as_str();
    let mut rows: Vec<(String, Decimal, bool)> = vec![("Subtotal".into(), t.subtotal, false)];
    if !doc.discount_rate().is_zero() {
        rows.push((
            format!("Discount ({})", format_rate(doc.discount_rate())),
            -t.discount_amount,
            false,
        ));
    }
    if !doc.tax_rate().is_zero() {
        rows.push((format!("Tax ({})", format_rate(doc.tax_rate())), t.tax_amount, false));
    }
    rows.push(("Total".into(), t.total, true));

    for (label, amount, bold) in rows {
        let size = if bold { 12.0 } else { BODY_SIZE };
        c.text(COL_QTY, size, bold, BLACK, label);
        c.text_right(RIGHT, size, bold, format_amount(amount, currency));
        c.y -= ROW_HEIGHT;
    }
    c.y -= 10.0;
}

fn footer(c: &mut Cursor, doc: &Document) {
    let sections = [("Notes", doc.notes.as_deref()), ("Terms", doc.terms.as_deref())];
    for (label, text) in sections {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            continue;
        };
        c.ensure(2.0 * ROW_HEIGHT);
        c.text(MARGIN, BODY_SIZE, true, GRAY, label);
        c.y -= 14.0;
        for line in wrap(text, WRAP_CHARS) {
            c.ensure(14.0);
            c.text(MARGIN, 9.0, false, BLACK, line);
            c.y -= 12.0;
        }
        c.y -= 8.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn doc(items: usize) -> Document {
        let mut b = DocumentBuilder::new(
            DocumentKind::Quote,
            "QUO-2024-003",
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
        .deadline(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        .client(Client::new("Contoso Ltd").address("1 Main St\nSpringfield"))
        .discount_rate(dec!(5))
        .tax_rate(dec!(10));
        for i in 1..=items {
            b = b.add_item(LineItem::new(i.to_string(), format!("Service {i}"), dec!(1), dec!(100)));
        }
        b.build().unwrap()
    }

    fn all_text(pages: &[Page]) -> Vec<String> {
        pages
            .iter()
            .flat_map(|p| p.runs.iter().map(|r| r.text.clone()))
            .collect()
    }

    #[test]
    fn quote_shows_valid_until_and_totals() {
        let text = all_text(&layout(&doc(2), Template::Classic));
        assert!(text.contains(&"QUOTE".to_string()));
        assert!(text.contains(&"Valid until:".to_string()));
        assert!(text.contains(&"Prepared for".to_string()));
        assert!(text.contains(&"Springfield".to_string()));
        assert!(text.contains(&"Discount (5%)".to_string()));
        // 200 - 10 = 190, + 19 tax
        assert!(text.contains(&"$209.00".to_string()));
    }

    #[test]
    fn long_documents_span_pages() {
        let pages = layout(&doc(80), Template::Minimal);
        assert!(pages.len() > 1);
        let text = all_text(&pages);
        assert!(text.contains(&format!("Page 1 of {}", pages.len())));
        let rows = text.iter().filter(|t| t.starts_with("Service ")).count();
        assert_eq!(rows, 80);
    }

    #[test]
    fn modern_template_draws_band() {
        let pages = layout(&doc(1), Template::Modern);
        assert!(pages[0].rects.iter().any(|r| r.color == ACCENT));
        let minimal = layout(&doc(1), Template::Minimal);
        assert!(minimal[0].rects.is_empty());
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn truncates_long_descriptions() {
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("short", 8), "short");
    }
}
