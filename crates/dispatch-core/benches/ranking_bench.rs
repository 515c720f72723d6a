use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dispatch_core::matching::eligible_collectors;
use dispatch_core::types::AvailabilityWindow;
use dispatch_core::*;

fn make_collectors(n: usize) -> Vec<Collector> {
    (0..n)
        .map(|i| {
            let offset = (i % 200) as f64 * 0.001;
            let category = ScrapCategory::ALL[i % ScrapCategory::ALL.len()];
            Collector {
                id: format!("c-{i:05}"),
                name: format!("Collector {i}"),
                home: Coordinate::new(12.97 + offset, 77.59 - offset).unwrap(),
                categories: [category, ScrapCategory::Other].into_iter().collect(),
                availability: AvailabilityWindow::parse("08:00", "18:00").unwrap(),
                active: i % 10 != 0,
            }
        })
        .collect()
}

fn make_draft() -> PickupDraft {
    PickupDraft {
        origin: Coordinate::new(12.97, 77.59).unwrap(),
        categories: [ScrapCategory::Plastic, ScrapCategory::Metal].into_iter().collect(),
        preferred_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        preferred_time: "10:30".parse().unwrap(),
        pickup_address: "bench".into(),
    }
}

fn bench_eligible_collectors(c: &mut Criterion) {
    let draft = make_draft();
    for n in [100, 10_000] {
        let collectors = make_collectors(n);
        c.bench_function(&format!("eligible_collectors_{n}"), |b| {
            b.iter(|| eligible_collectors(black_box(&draft), black_box(&collectors), 10.0));
        });
    }
}

fn bench_settlement(c: &mut Criterion) {
    let calc = SettlementCalculator::new(PriceTable::standard());
    let items: Vec<ScrapItem> = ScrapCategory::ALL
        .iter()
        .map(|&cat| ScrapItem::new(cat, 3.25))
        .collect();

    c.bench_function("settle_six_items", |b| {
        b.iter(|| calc.settle(black_box(&items)).unwrap());
    });
}

criterion_group!(benches, bench_eligible_collectors, bench_settlement);
criterion_main!(benches);
