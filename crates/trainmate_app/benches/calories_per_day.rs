use chrono::{Duration, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use trainmate_app::domains::calories::{calculate_calories_per_day, chart_points};
use trainmate_client::CalorieRecord;

/// A year of workouts, three a day, with every fiftieth record malformed.
fn records() -> Vec<CalorieRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    (0..365 * 3)
        .map(|i| {
            if i % 50 == 0 {
                return CalorieRecord::new("not a date", 100.0);
            }
            let day = start + Duration::days(i / 3);
            CalorieRecord::new(&day.format("%Y-%m-%d").to_string(), 150.0 + (i % 7) as f64)
        })
        .collect()
}

fn bench_calories_per_day(c: &mut Criterion) {
    let input = records();
    c.bench_function("calculate_calories_per_day_year", |b| {
        b.iter(|| calculate_calories_per_day(black_box(&input)))
    });

    let per_day = calculate_calories_per_day(&input);
    c.bench_function("chart_points_year", |b| {
        b.iter(|| chart_points(black_box(&per_day)))
    });
}

criterion_group!(benches, bench_calories_per_day);
criterion_main!(benches);
