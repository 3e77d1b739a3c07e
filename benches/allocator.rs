use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use replenishment_optimization::types::ProductId;
use replenishment_optimization::variants::allocator::{allocate, AllocatorItem};

fn random_deal(n: usize, seed: u64) -> Vec<AllocatorItem> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| AllocatorItem {
            product_id: ProductId(i as u64),
            inventory: rng.gen_range(0..20) as f64,
            system_suggested_quantity: rng.gen_range(0..30) as f64,
            ads: 1.0 + rng.gen_range(0..3) as f64,
            eligible: true,
        })
        .collect()
}

fn bench_allocate_large_deal(c: &mut Criterion) {
    let items = random_deal(100, 42);

    c.bench_function("allocate_100_items_diff_2000", |b| b.iter(|| allocate(black_box(&items), black_box(5_000))));
}

criterion_group!(benches, bench_allocate_large_deal);
criterion_main!(benches);
