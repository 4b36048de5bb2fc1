//! Validation engine performance benchmarks.
//!
//! Measures rule evaluation alone and the full parse-validate pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;
use tempfile::NamedTempFile;
use watchdog::{
    Dataset, EngineConfig, Parser, Preset, Rule, RuleSet, Watchdog, WatchdogConfig,
};

/// Generate transaction CSV with a sprinkling of bad rows.
fn generate_transactions(rows: usize) -> String {
    let mut data = String::from("Transaction ID,Price,Quantity,Customer ID,Status\n");
    let statuses = ["paid", "refunded", "pending", "lost"];

    for row in 0..rows {
        let price = if row % 37 == 0 { -1.0 } else { 5.0 + (row % 100) as f64 * 0.25 };
        let quantity = if row % 53 == 0 { String::new() } else { (1 + row % 5).to_string() };
        let customer = if row % 41 == 0 { String::new() } else { format!("C{:05}", row % 900) };
        let id = if row % 97 == 0 { row.saturating_sub(1) } else { row };
        data.push_str(&format!(
            "T{:06},{},{},{},{}\n",
            id,
            price,
            quantity,
            customer,
            statuses[row % statuses.len()]
        ));
    }

    data
}

fn rules() -> RuleSet {
    let mut rules = Preset::Ecommerce.rules();
    rules.push(Rule::unique("Transaction ID"));
    rules.push(Rule::member_of("Status", ["paid", "refunded", "pending"]).unwrap());
    rules
}

fn parse(data: &str) -> Dataset {
    Parser::new().parse_str(data).unwrap()
}

/// Benchmark rule evaluation on an in-memory dataset, parallel and sequential.
fn bench_validate_dataset(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_dataset");
    let rules = rules();

    for rows in [100, 1_000, 10_000].iter() {
        let dataset = parse(&generate_transactions(*rows));
        group.throughput(Throughput::Elements(*rows as u64));

        for parallel in [true, false] {
            let watchdog = Watchdog::with_config(
                WatchdogConfig::default().with_engine(EngineConfig { parallel }),
            );
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, rows), &dataset, |b, ds| {
                b.iter(|| watchdog.validate_dataset(black_box(ds), &rules).unwrap())
            });
        }
    }

    group.finish();
}

/// Benchmark the full pipeline from a file on disk.
fn bench_validate_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_file");
    let rules = rules();
    let watchdog = Watchdog::new();

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_transactions(*rows);
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(data.as_bytes()).unwrap();
        temp.flush().unwrap();

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), temp.path(), |b, path| {
            b.iter(|| watchdog.validate_file(black_box(path), &rules).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_validate_dataset, bench_validate_file);
criterion_main!(benches);
