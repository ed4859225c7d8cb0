use billdoc::core::*;
use billdoc::store::JsonFileStore;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("documents.json");
    let mut store = JsonFileStore::open(&path)?;

    let settings = WorkbenchSettings {
        currency_code: "EUR".into(),
        tax_rate: dec!(19),
        ..WorkbenchSettings::default()
    };
    let policy = TransitionPolicy::Strict;
    let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
    let mut numbers = DocumentNumbers::from_settings(&settings, 2024);

    // ── 1. Draft two quotes ────────────────────────────────────────────
    let mut accepted = DocumentBuilder::from_settings(&settings, DocumentKind::Quote, numbers.next(DocumentKind::Quote, date)?, date)
        .client(Client::new("Contoso Ltd").email("procurement@contoso.test"))
        .add_item(LineItem::new("1", "Discovery workshop", dec!(1), dec!(1200)))
        .add_item(LineItem::new("2", "Prototype build", dec!(40), dec!(95)))
        .discount_rate(dec!(10))
        .build()?;
    let mut declined = DocumentBuilder::from_settings(&settings, DocumentKind::Quote, numbers.next(DocumentKind::Quote, date)?, date)
        .client(Client::new("Fabrikam"))
        .add_item(LineItem::new("1", "Support retainer", dec!(12), dec!(450)))
        .category("retainer")
        .build()?;

    lifecycle::save(&mut accepted, &mut store)?;
    lifecycle::save(&mut declined, &mut store)?;

    // ── 2. Send, then record the client's answer ───────────────────────
    lifecycle::send(&mut accepted, &mut store, policy)?;
    lifecycle::send(&mut declined, &mut store, policy)?;
    lifecycle::set_status(&mut accepted, DocumentStatus::Accepted, policy)?;
    lifecycle::set_status(&mut declined, DocumentStatus::Declined, policy)?;
    lifecycle::save(&mut accepted, &mut store)?;
    lifecycle::save(&mut declined, &mut store)?;

    // Terminal quotes stay final under the strict policy.
    if let Err(e) = lifecycle::send(&mut accepted, &mut store, policy) {
        println!("Resend refused: {e}");
    }

    // ── 3. Reopen and list ─────────────────────────────────────────────
    drop(store);
    let store = JsonFileStore::open(&path)?;
    println!("\nStored in {}:", path.display());
    for doc in store.list()? {
        println!(
            "  {:<14} {:<12} {:<10} valid until {}  total {}",
            doc.number,
            doc.client.as_ref().map_or("-", |c| c.name.as_str()),
            doc.status().label(),
            doc.valid_until().map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            format_amount(doc.totals().total, &doc.currency_code),
        );
    }

    // ── 4. Convert the accepted quote into an invoice ──────────────────
    let Some(quote) = store.load(&accepted.id)? else {
        return Ok(());
    };
    // A fresh process picks the counters up from the store.
    let mut numbers = DocumentNumbers::from_settings(&settings, 2024);
    numbers.resume_from(&store)?;
    let invoice_date = NaiveDate::from_ymd_opt(2024, 9, 20).unwrap();
    let mut builder = DocumentBuilder::from_settings(
        &settings,
        DocumentKind::Invoice,
        numbers.next(DocumentKind::Invoice, invoice_date)?,
        invoice_date,
    )
    .discount_rate(quote.discount_rate())
    .tax_rate(quote.tax_rate());
    if let Some(client) = quote.client.clone() {
        builder = builder.client(client);
    }
    for item in quote.items() {
        builder = builder.add_item(item.clone());
    }
    let invoice = builder.build()?;
    println!(
        "\n{} {} issued for {} (due {})",
        invoice.kind(),
        invoice.number,
        format_amount(invoice.totals().total, &invoice.currency_code),
        invoice.due_date().map(|d| d.to_string()).unwrap_or_default(),
    );
    Ok(())
}
