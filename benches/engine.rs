//! Matching-core benchmarks (Criterion).
//!
//! Run: `cargo bench` or `cargo bench --bench engine`.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use matchbook::order_gen::{Generator, GeneratorConfig};
use matchbook::{matching, OrderBook};

fn bench_process_order_throughput(c: &mut Criterion) {
    const N: usize = 1000;
    let mut group = c.benchmark_group("matching");
    group.throughput(Throughput::Elements(N as u64));
    group.bench_function("process_order_1000", |b| {
        b.iter_batched(
            || {
                let config = GeneratorConfig {
                    seed: 42,
                    num_orders: N,
                    limit_ratio: 1.0,
                    ..Default::default()
                };
                let orders = Generator::new(config).all_orders();
                (OrderBook::new("GEN"), orders)
            },
            |(mut book, orders)| {
                for mut order in orders {
                    let _ = matching::process_order(&mut book, &mut order);
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_cancel(c: &mut Criterion) {
    const RESTING: usize = 500;
    const CANCELS_PER_ITER: usize = 100;
    let mut group = c.benchmark_group("matching");
    group.throughput(Throughput::Elements(CANCELS_PER_ITER as u64));
    group.bench_function("cancel_100_of_500_resting", |b| {
        b.iter_batched(
            || {
                let config = GeneratorConfig {
                    seed: 123,
                    num_orders: RESTING,
                    limit_ratio: 1.0,
                    // keep the sides apart so everything rests
                    buy_ratio: 1.0,
                    ..Default::default()
                };
                let mut book = OrderBook::new("GEN");
                let orders = Generator::new(config).all_orders();
                let cancel_ids: Vec<String> = orders
                    .iter()
                    .take(CANCELS_PER_ITER)
                    .map(|o| o.id.clone())
                    .collect();
                for mut order in orders {
                    let _ = matching::process_order(&mut book, &mut order);
                }
                (book, cancel_ids)
            },
            |(mut book, cancel_ids)| {
                for id in cancel_ids {
                    book.cancel(&id);
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    const RESTING: usize = 1000;
    let mut group = c.benchmark_group("matching");
    group.bench_function("aggregate_depth_10_of_1000_resting", |b| {
        b.iter_batched(
            || {
                let config = GeneratorConfig {
                    seed: 7,
                    num_orders: RESTING,
                    limit_ratio: 1.0,
                    buy_ratio: 1.0,
                    price_min: 1,
                    price_max: 200,
                    ..Default::default()
                };
                let mut book = OrderBook::new("GEN");
                for mut order in Generator::new(config).all_orders() {
                    let _ = matching::process_order(&mut book, &mut order);
                }
                book
            },
            |book| {
                criterion::black_box(book.aggregate(matchbook::Side::Buy, 10));
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_process_order_throughput,
    bench_cancel,
    bench_aggregate
);
criterion_main!(benches);
