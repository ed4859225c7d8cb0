use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use billdoc::core::*;

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn build_document(kind: DocumentKind, items: usize) -> Document {
    let mut builder = DocumentBuilder::new(kind, "BENCH-001", test_date())
        .deadline(NaiveDate::from_ymd_opt(2024, 7, 15).unwrap())
        .client(Client::new("Benchmark Ltd").email("bench@example.test"))
        .discount_rate(dec!(5))
        .tax_rate(dec!(19));

    for i in 1..=items {
        builder = builder.add_item(LineItem::new(
            i.to_string(),
            format!("Service item {i}"),
            dec!(2),
            dec!(9.99),
        ));
    }

    builder.build().unwrap()
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_invoice_10_items", |b| {
        b.iter(|| black_box(build_document(DocumentKind::Invoice, 10)));
    });
}

fn bench_recompute(c: &mut Criterion) {
    let small = build_document(DocumentKind::Invoice, 10);
    let large = build_document(DocumentKind::Quote, 1000);

    c.bench_function("recompute_10_items", |b| {
        b.iter(|| black_box(recompute(black_box(small.items()), dec!(5), dec!(19))));
    });
    c.bench_function("recompute_1000_items", |b| {
        b.iter(|| black_box(recompute(black_box(large.items()), dec!(5), dec!(19))));
    });
}

fn bench_edit(c: &mut Criterion) {
    let doc = build_document(DocumentKind::Invoice, 1000);
    c.bench_function("edit_quantity_1000_items", |b| {
        b.iter_batched(
            || doc.clone(),
            |mut d| {
                d.set_quantity("500", dec!(3)).unwrap();
                black_box(d)
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_validate(c: &mut Criterion) {
    let doc = build_document(DocumentKind::Invoice, 1000);
    c.bench_function("validate_1000_items", |b| {
        b.iter(|| black_box(validate_document(black_box(&doc))));
    });
}

fn bench_send(c: &mut Criterion) {
    let doc = build_document(DocumentKind::Invoice, 10);
    c.bench_function("send_to_memory_store", |b| {
        b.iter_batched(
            || (doc.clone(), MemoryStore::new()),
            |(mut d, mut store)| {
                lifecycle::send(&mut d, &mut store, TransitionPolicy::Permissive).unwrap();
                black_box(store)
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_recompute,
    bench_edit,
    bench_validate,
    bench_send,
);
criterion_main!(benches);
