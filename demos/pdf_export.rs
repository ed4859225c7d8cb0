use std::path::PathBuf;

use billdoc::core::*;
use billdoc::pdf::{self, Template};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let out_dir: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);

    let mut builder = DocumentBuilder::new(
        DocumentKind::Invoice,
        "INV-2024-042",
        NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
    )
    .deadline(NaiveDate::from_ymd_opt(2024, 10, 31).unwrap())
    .currency("GBP")
    .client(
        Client::new("Tailspin Toys")
            .email("accounts@tailspin.test")
            .address("4 Mill Lane\nLeeds LS1 4AB"),
    )
    .discount_rate(dec!(2.5))
    .tax_rate(dec!(20))
    .notes("Thank you for your business.")
    .terms("Payment due within 30 days. Late payments incur interest at 8% above base rate.");

    for i in 1..=60 {
        builder = builder.add_item(LineItem::new(
            i.to_string(),
            format!("Component batch #{i}"),
            dec!(25),
            dec!(3.40),
        ));
    }
    let invoice = builder.build().expect("invoice should be valid");

    for template in Template::ALL {
        let dir = out_dir.join(template.name());
        if let Err(e) = std::fs::create_dir_all(&dir) {
            println!("{}: cannot create {}: {e}", template.name(), dir.display());
            continue;
        }
        let status = pdf::export_to_dir(&invoice, template, &dir);
        println!("{:<8} {}", template.name(), status.message());
    }

    // An inconsistent document is refused instead of printed.
    let json = serde_json::to_string(&invoice).unwrap();
    let tampered = json.replacen("\"tax_rate\":\"20\"", "\"tax_rate\":\"5\"", 1);
    let broken: Document = serde_json::from_str(&tampered).unwrap();
    let status = pdf::export_to_dir(&broken, Template::Classic, &out_dir);
    println!("tampered {}", status.message());
}
