use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polars::prelude::DataFrame;
use repdays::{calendar_days, records_to_frame, HourlyRecord, RepresentativeDaySelector};
use std::f64::consts::PI;

fn synthetic_year(zones: &[&str]) -> DataFrame {
    let records: Vec<HourlyRecord> = zones
        .iter()
        .enumerate()
        .flat_map(|(z, zone)| {
            calendar_days().enumerate().flat_map(move |(doy, (month, day))| {
                let season = 0.5 + 0.3 * (2.0 * PI * (doy as f64 + 60.0 * z as f64) / 365.0).cos();
                (0..24).map(move |hour| {
                    let diurnal = 0.5 - 0.5 * (2.0 * PI * (hour as f64 - 4.0) / 24.0).cos();
                    HourlyRecord::new(*zone, month, day, hour, 0.1 + season * diurnal)
                })
            })
        })
        .collect();
    records_to_frame(&records).expect("synthetic frame")
}

fn bench_selector(c: &mut Criterion) {
    let load = synthetic_year(&["North", "Central", "South"]);
    let selector = RepresentativeDaySelector::default();
    c.bench_function("select_12_of_20", |b| {
        b.iter(|| selector.select(black_box(&load), None))
    });
}

criterion_group!(benches, bench_selector);
criterion_main!(benches);
