use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engagerec::algorithms::{rank_items, similarity, InteractionTable};
use engagerec::config::{RecommenderConfig, SeedConfig};
use engagerec::services::store::seed::{generate_dataset, rng_from_seed};
use engagerec::*;
use std::sync::Arc;

fn synthetic_dataset(users: usize, items: usize) -> Dataset {
    let config = SeedConfig {
        users,
        items,
        rng_seed: Some(17),
    };
    generate_dataset(&config, &mut rng_from_seed(config.rng_seed))
}

fn benchmark_matrix_build(c: &mut Criterion) {
    let dataset = synthetic_dataset(200, 300);

    c.bench_function("interaction_table_pivot", |b| {
        b.iter(|| {
            black_box(InteractionTable::from_interactions(&dataset.interactions).unwrap());
        });
    });

    let table = InteractionTable::from_interactions(&dataset.interactions)
        .unwrap()
        .unwrap();

    c.bench_function("item_similarity", |b| {
        b.iter(|| {
            black_box(similarity::compute(&table).unwrap());
        });
    });
}

fn benchmark_recommend(c: &mut Criterion) {
    let dataset = synthetic_dataset(200, 300);
    let table = InteractionTable::from_interactions(&dataset.interactions)
        .unwrap()
        .unwrap();
    let sim = similarity::compute(&table).unwrap();

    c.bench_function("rank_items", |b| {
        b.iter(|| {
            black_box(rank_items(&table, &sim, 42, 10, 0.1));
        });
    });

    let store = Arc::new(InMemoryStore::from_dataset(dataset).unwrap());
    let service = RecommendationService::new(store.clone(), store, RecommenderConfig::default());
    service.build(false);

    c.bench_function("service_recommend_cached", |b| {
        b.iter(|| {
            black_box(service.recommend(42, 10));
        });
    });

    c.bench_function("service_recommend_cold_start", |b| {
        b.iter(|| {
            black_box(service.recommend(1_000_000, 10));
        });
    });
}

criterion_group!(benches, benchmark_matrix_build, benchmark_recommend);
criterion_main!(benches);
