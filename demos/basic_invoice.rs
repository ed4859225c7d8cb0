use billdoc::core::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = WorkbenchSettings::default();
    let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let mut numbers = DocumentNumbers::from_settings(&settings, 2024);
    let number = numbers
        .next(DocumentKind::Invoice, date)
        .expect("date is in the numbering year");

    let mut invoice = DocumentBuilder::from_settings(&settings, DocumentKind::Invoice, number, date)
        .client(
            Client::new("Northwind Traders")
                .email("billing@northwind.test")
                .address("12 Harbour Road\nPortsmouth"),
        )
        .add_item(LineItem::new("1", "Website redesign", dec!(40), dec!(95)))
        .add_item(LineItem::new("2", "Hosting (12 months)", dec!(12), dec!(19.90)))
        .discount_rate(dec!(5))
        .tax_rate(dec!(8.25))
        .notes("Thank you for your business.")
        .build()
        .expect("invoice should be valid");

    // edits recompute immediately
    let id = invoice.add_item().unwrap().id().to_string();
    invoice.set_description(&id, "Rush delivery").unwrap();
    invoice.set_quantity(&id, dec!(1)).unwrap();
    invoice.set_unit_price(&id, dec!(250)).unwrap();

    let code = invoice.currency_code.clone();
    println!("{}: {}", invoice.kind(), invoice.number);
    println!("Date:    {}", invoice.date);
    if let Some(due) = invoice.due_date() {
        println!("Due:     {due}");
    }
    if let Some(client) = &invoice.client {
        println!("Client:  {}", client.name);
    }
    println!("---");
    for item in invoice.items() {
        println!(
            "  {:>3} x {:<24} @ {:>10} = {:>12}",
            item.quantity(),
            item.description(),
            format_amount(item.unit_price(), &code),
            format_amount(item.total(), &code),
        );
    }
    let t = invoice.totals().rounded();
    println!("---");
    println!("Subtotal: {}", format_amount(t.subtotal, &code));
    println!(
        "Discount ({}): -{}",
        format_rate(invoice.discount_rate()),
        format_amount(t.discount_amount, &code)
    );
    println!("Tax ({}): {}", format_rate(invoice.tax_rate()), format_amount(t.tax_amount, &code));
    println!("Total:    {}", format_amount(t.total, &code));

    let mut store = MemoryStore::new();
    lifecycle::send(&mut invoice, &mut store, settings.transition_policy).unwrap();
    println!("Status:  {}", invoice.status());

    let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
    if lifecycle::mark_overdue(&mut invoice, today) {
        println!("Status on {today}: {}", invoice.status());
    }
}
