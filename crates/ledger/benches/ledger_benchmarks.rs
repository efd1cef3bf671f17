use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use storehouse_inventory::unit::{GRAM, KILOGRAM, MILLILITER, PIECE};
use storehouse_inventory::{
    GroupRegistry, Item, ItemCatalog, Storage, Transaction, TransactionLog, UnitRegistry,
};
use storehouse_ledger::{Period, generate};
use storehouse_observability::ObservabilityConfig;

struct Setup {
    catalog: ItemCatalog,
    storages: Vec<Arc<Storage>>,
    log: TransactionLog,
    period: Period,
}

/// Deterministic catalog of `items` items spread over four unit families and
/// a log of `movements` movements spread over three storages and a year.
fn setup(items: usize, movements: usize) -> Setup {
    let units = UnitRegistry::standard().unwrap();
    let mut groups = GroupRegistry::new();
    let group = groups.create("bench").unwrap();
    let native = [GRAM, KILOGRAM, MILLILITER, PIECE];

    let mut catalog = ItemCatalog::new();
    for i in 0..items {
        let unit = units.require(native[i % native.len()]).unwrap();
        let name = format!("item-{i}");
        catalog
            .add(Item::new(&name, &name, Arc::clone(&group), unit).unwrap())
            .unwrap();
    }

    let storages: Vec<_> = (0..3)
        .map(|i| Arc::new(Storage::new(&format!("storage-{i}"), "bench").unwrap()))
        .collect();

    let year_start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let catalog_items: Vec<_> = catalog.iter().cloned().collect();
    let log: TransactionLog = (0..movements)
        .map(|i| {
            let item = &catalog_items[i % catalog_items.len()];
            let storage = &storages[i % storages.len()];
            let magnitude = Decimal::from((i % 97 + 1) as i64);
            let quantity = if i % 3 == 0 { -magnitude } else { magnitude };
            let at = year_start + Duration::minutes((i * 37 % 525_600) as i64);
            Transaction::new(
                Arc::clone(item),
                Arc::clone(item.unit()),
                Arc::clone(storage),
                quantity,
                at,
            )
            .unwrap()
        })
        .collect();

    let period = Period::new(
        Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap(),
    )
    .unwrap();

    Setup {
        catalog,
        storages,
        log,
        period,
    }
}

fn bench_generate(c: &mut Criterion) {
    storehouse_observability::tracing::init_with(
        &ObservabilityConfig::default().with_filter("warn"),
    );

    let mut group = c.benchmark_group("ledger_generate");

    for &movements in &[1_000usize, 10_000, 100_000] {
        let s = setup(200, movements);
        group.throughput(Throughput::Elements(movements as u64));
        group.bench_with_input(BenchmarkId::from_parameter(movements), &s, |b, s| {
            b.iter(|| {
                let report =
                    generate(&s.period, &s.storages[0], &s.catalog, &s.log).unwrap();
                black_box(report)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
