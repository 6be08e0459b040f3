//! Benchmarks comparing the level storage backends.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pricebook::types::{Order, OrderId, Side};
use pricebook::{Backend, LimitOrderBook};

const SEED: u64 = 0x5eed;

/// Random bids spread over `levels` prices around 10_000
fn workload(levels: i64, orders: usize) -> Vec<Order> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..orders)
        .map(|i| {
            let price = 10_000 - rng.gen_range(0..levels);
            Order::bid(i as u64 + 1, price, rng.gen_range(1..100))
        })
        .collect()
}

fn populated(backend: Backend, orders: &[Order]) -> LimitOrderBook {
    let mut book = LimitOrderBook::with_backend("BENCH", backend);
    for &order in orders {
        book.add_order(order).unwrap();
    }
    book
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for levels in [10, 100, 1000] {
        let orders = workload(levels, 2_000);
        for backend in Backend::ALL {
            group.bench_with_input(
                BenchmarkId::new(backend.name(), levels),
                &orders,
                |b, orders| {
                    b.iter(|| black_box(populated(backend, orders)));
                },
            );
        }
    }

    group.finish();
}

fn bench_cancel(c: &mut Criterion) {
    let mut group = c.benchmark_group("cancel_reinsert");

    for levels in [10, 100, 1000] {
        let orders = workload(levels, 2_000);
        let mut rng = StdRng::seed_from_u64(SEED + 1);
        let targets: Vec<Order> = (0..256)
            .map(|_| orders[rng.gen_range(0..orders.len())])
            .collect();

        for backend in Backend::ALL {
            group.bench_with_input(
                BenchmarkId::new(backend.name(), levels),
                &targets,
                |b, targets| {
                    let mut book = populated(backend, &orders);
                    let mut i = 0;
                    b.iter(|| {
                        let order = targets[i % targets.len()];
                        i += 1;
                        book.cancel_order(order.id, Side::Bid, order.price).unwrap();
                        book.add_order(order).unwrap();
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_best_price(c: &mut Criterion) {
    let mut group = c.benchmark_group("best_after_cancel");

    for levels in [10, 100, 1000] {
        let orders: Vec<Order> = (0..levels)
            .map(|i| Order::bid(i as u64 + 1, 10_000 - i, 10))
            .collect();
        let best = orders[0];

        for backend in Backend::ALL {
            group.bench_with_input(
                BenchmarkId::new(backend.name(), levels),
                &orders,
                |b, orders| {
                    let mut book = populated(backend, orders);
                    // Cancelling the best level forces each backend to find
                    // the next one.
                    b.iter(|| {
                        book.cancel_order(OrderId(best.id.0), Side::Bid, best.price)
                            .unwrap();
                        black_box(book.best_bid());
                        book.add_order(best).unwrap();
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_10");
    let orders = workload(1000, 5_000);

    for backend in Backend::ALL {
        let book = populated(backend, &orders);
        group.bench_function(backend.name(), |b| {
            b.iter(|| black_box(book.snapshot(10)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_cancel,
    bench_best_price,
    bench_snapshot
);
criterion_main!(benches);
