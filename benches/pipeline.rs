//! Benchmarks for the dashboard pipeline stages.

use bikeshare_insights::aggregation::aggregate;
use bikeshare_insights::classification::classify;
use bikeshare_insights::config::DashboardConfig;
use bikeshare_insights::core::{DateRange, Record, RecordStore};
use bikeshare_insights::dashboard::{AnalysisMode, Dashboard};
use bikeshare_insights::seasonality::SeasonalDecomposer;
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Hourly-style records: `hours` rows per day with a weekly cycle.
fn generate_records(days: usize, hours: usize) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(42);
    let start = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
    let mut records = Vec::with_capacity(days * hours);
    for day in 0..days {
        let date = start + Duration::days(day as i64);
        let weekend = matches!(day % 7, 0 | 1);
        for _ in 0..hours {
            let casual = if weekend {
                rng.gen_range(20..120)
            } else {
                rng.gen_range(5..40)
            };
            let registered = rng.gen_range(60..260);
            records.push(Record::new(date, casual, registered));
        }
    }
    records
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_stages");

    for days in [90, 365, 730].iter() {
        let records = generate_records(*days, 24);
        let daily = aggregate(&records);

        group.bench_with_input(BenchmarkId::new("aggregate", days), days, |b, _| {
            b.iter(|| aggregate(black_box(&records)))
        });

        group.bench_with_input(BenchmarkId::new("classify", days), days, |b, _| {
            b.iter(|| classify(black_box(&daily)))
        });

        group.bench_with_input(BenchmarkId::new("decompose", days), days, |b, _| {
            let decomposer = SeasonalDecomposer::new();
            b.iter(|| decomposer.decompose(black_box(&daily)))
        });
    }

    group.finish();
}

fn bench_dashboard(c: &mut Criterion) {
    let store = RecordStore::from_records(generate_records(730, 24));
    let dashboard = Dashboard::new(store, DashboardConfig::default()).unwrap();
    let quarter = DateRange::new(
        NaiveDate::from_ymd_opt(2012, 4, 1).unwrap(),
        NaiveDate::from_ymd_opt(2012, 6, 30).unwrap(),
    )
    .unwrap();

    let mut group = c.benchmark_group("dashboard_view");
    group.bench_function("full_span", |b| {
        b.iter(|| dashboard.view(black_box(None), AnalysisMode::Full))
    });
    group.bench_function("one_quarter", |b| {
        b.iter(|| dashboard.view(black_box(Some(quarter)), AnalysisMode::Full))
    });
    group.finish();
}

criterion_group!(benches, bench_stages, bench_dashboard);
criterion_main!(benches);
