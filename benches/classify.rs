use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use smart_money::analysis::{build_table, classify, Thresholds};
use smart_money::data::types::{Candle, CandleSelection, SymbolSeries};

const DAY_MS: u64 = 86_400_000;

fn create_test_candle(day: u64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
    Candle {
        time_open: day * DAY_MS,
        open,
        high,
        low,
        close,
        volume,
    }
}

fn generate_series(count: usize) -> Vec<SymbolSeries> {
    (0..count)
        .map(|i| {
            let base_price = 10.0 + (i as f64) * 0.7;
            let noise = (i as f64 % 10.0) * 0.5;
            let candles = (0..5u64)
                .map(|d| {
                    create_test_candle(
                        d,
                        base_price + noise,
                        base_price * 1.08 + noise,
                        base_price * 0.97 + noise,
                        base_price * (1.0 + (d as f64 - 2.0) / 100.0) + noise,
                        1000.0 + ((i as u64 * 37 + d * 101) % 900) as f64,
                    )
                })
                .collect();
            SymbolSeries::new(format!("C{i}/USDT"), "1d", candles)
        })
        .collect()
}

fn bench_build_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_table");

    for count in [20, 100, 1000] {
        let series = generate_series(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &series, |b, series| {
            b.iter(|| build_table(black_box(series), CandleSelection::SkipLatest, DAY_MS));
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let thresholds = Thresholds::default();

    for count in [20, 100, 1000] {
        let table = build_table(&generate_series(count), CandleSelection::SkipLatest, DAY_MS);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &table, |b, table| {
            b.iter(|| classify(black_box(table), &thresholds));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_table, bench_classify);
criterion_main!(benches);
