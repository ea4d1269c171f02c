use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use meteo_pipeline::{
    aggregate, normalize, series_to_csv, Granularity, RawBlock, ReductionTable, Resolution, TimeMode,
};
use serde_json::{json, Value};

/// A year of hourly readings for three parameters, every tenth value missing.
fn hourly_year() -> RawBlock {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let hours = 365 * 24;
    let time = (0..hours)
        .map(|h| json!((start + Duration::hours(h)).format("%Y-%m-%dT%H:%M").to_string()))
        .collect();
    let column = |scale: f64| -> Vec<Value> {
        (0..hours)
            .map(|h| if h % 10 == 0 { Value::Null } else { json!(h as f64 * scale % 40.0) })
            .collect()
    };
    RawBlock {
        resolution: Resolution::Hourly,
        time,
        parameters: vec![
            ("temperature_2m".to_string(), column(0.1)),
            ("rain".to_string(), column(0.01)),
            ("wind_speed_10m".to_string(), column(0.3)),
        ],
    }
}

fn bench_pipeline(c: &mut Criterion) {
    let block = hourly_year();
    let table = ReductionTable::default();
    c.bench_function("normalize_hourly_year", |b| {
        b.iter(|| normalize(black_box(&block), TimeMode::Naive))
    });

    let Ok(series) = normalize(&block, TimeMode::Naive) else {
        return;
    };
    c.bench_function("aggregate_daily", |b| {
        b.iter(|| aggregate(black_box(&series), Granularity::Daily, &table))
    });
    c.bench_function("aggregate_weekly", |b| {
        b.iter(|| aggregate(black_box(&series), Granularity::Weekly, &table))
    });
    c.bench_function("series_to_csv", |b| b.iter(|| series_to_csv(black_box(&series))));
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
