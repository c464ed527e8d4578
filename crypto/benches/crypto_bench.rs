use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pricevote_types::{ExchangeRateTuples, ValidatorAddress};

fn blake2b_256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("blake2b_256_256B", |b| {
        b.iter(|| pricevote_crypto::blake2b_256(black_box(&data)))
    });
}

fn vote_hash_bench(c: &mut Criterion) {
    let voter = ValidatorAddress::new("pvvaloper_bench");
    let tuples: ExchangeRateTuples = (0..20)
        .map(|i| format!("(tok{i}:usd,{}.25)", 1000 + i))
        .collect::<Vec<_>>()
        .join("|")
        .parse()
        .expect("valid tuples");

    c.bench_function("vote_hash_20_pairs", |b| {
        b.iter(|| pricevote_crypto::vote_hash(black_box("a1b2c3"), black_box(&tuples), &voter))
    });
}

criterion_group!(benches, blake2b_256_bench, vote_hash_bench);
criterion_main!(benches);
