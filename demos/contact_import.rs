use billdoc::contacts::*;
use billdoc::core::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

const SHEET: &str = "\
Name,Email,Company,Status,Tags,Phone
Ada Lovelace,ada@analytical.test,Analytical Engines,active,vip;math,+44 20 7946 0000
Grace Hopper,grace@navy,,lead,,12
,,,,,
Alan Turing,alan@bletchley.test,Bletchley Park,,crypto;math,
Charles Babbage,charles@difference.test,,retired,,
";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Rows arrive already split; a real app would use its CSV reader here.
    let rows: Vec<Vec<&str>> = SHEET
        .lines()
        .map(|line| line.split(',').collect())
        .collect();
    let Some((header, body)) = rows.split_first() else {
        return;
    };

    let mapping = match FieldMapping::from_header(header) {
        Ok(m) => m,
        Err(e) => {
            println!("Cannot import: {e}");
            return;
        }
    };
    let report = import_rows(body, &mapping);
    println!(
        "Imported {} of {} rows",
        report.contacts.len(),
        report.rows_processed()
    );
    for err in &report.errors {
        println!("  {err}");
    }

    let mut book = ContactBook::new();
    book.extend(report.contacts);

    println!("\nContacts tagged 'math':");
    for c in book.search("math") {
        println!("  #{} {} <{}>", c.id, c.name, c.email.as_deref().unwrap_or("-"));
    }

    let page = paginate(&book.all(), 1, 2);
    println!("\nPage {} of {} ({} contacts):", page.page, page.total_pages, page.total_items);
    for c in &page.items {
        println!("  {} [{}]", c.name, c.status.label());
    }

    // Bill the first active contact.
    let Some(contact) = book.filter_status(ContactStatus::Active).into_iter().next() else {
        return;
    };
    let quote = DocumentBuilder::new(
        DocumentKind::Quote,
        "QUO-2024-001",
        NaiveDate::from_ymd_opt(2024, 11, 4).unwrap(),
    )
    .client(contact.to_client())
    .add_item(LineItem::new("1", "Analytical engine maintenance", dec!(6), dec!(180)))
    .tax_rate(dec!(20))
    .build();
    match quote {
        Ok(q) => println!(
            "\n{} {} for {}: {}",
            q.kind(),
            q.number,
            contact.name,
            format_amount(q.totals().total, &q.currency_code)
        ),
        Err(e) => println!("\nQuote rejected: {e}"),
    }
}
