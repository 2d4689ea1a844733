use columnar_frame::{CsvOptions, Table, Value, parse_csv};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::fmt::Write;

const ROWS: usize = 100_000;

fn make_csv(rows: usize) -> String {
    let mut csv = String::from("id,product,region,unit_price\n");
    let products = ["A", "B", "C", "D"];
    let regions = ["US", "EU", "ASIA", "AFRICA", "AUSTRALIA", "SOUTH AMERICA"];
    for i in 0..rows {
        writeln!(
            csv,
            "{},{},{},{}",
            i,
            products[i % products.len()],
            regions[(i / 7) % regions.len()],
            (i * 37) % 1000
        )
        .unwrap();
    }
    csv
}

fn make_table(rows: usize) -> Table {
    let csv = make_csv(rows);
    parse_csv(csv.as_bytes(), &CsvOptions::default()).unwrap()
}

fn load_and_reduce(c: &mut Criterion) {
    let csv = make_csv(ROWS);
    let table = make_table(ROWS);

    let mut group = c.benchmark_group("Table");
    group.sample_size(20);
    group.throughput(Throughput::Elements(ROWS as u64));

    group.bench_function("parse_csv", |b| {
        b.iter(|| parse_csv(csv.as_bytes(), &CsvOptions::default()).unwrap())
    });

    group.bench_function("sum", |b| b.iter(|| table.sum()));

    group.bench_function("unique_region", |b| {
        b.iter(|| table.unique("region").unwrap())
    });

    group.bench_function("fill_na", |b| b.iter(|| table.fill_na(Value::Int(0))));

    group.bench_function("group_by_product_sum", |b| {
        b.iter(|| {
            table
                .group_by(&["product"])
                .unwrap()
                .sum("unit_price")
                .unwrap()
        })
    });

    group.bench_function("group_by_product_region_max", |b| {
        b.iter(|| {
            table
                .group_by(&["product", "region"])
                .unwrap()
                .max("unit_price")
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, load_and_reduce);
criterion_main!(benches);
