use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pricevote_oracle::TallyEngine;
use pricevote_types::{AssetPair, ValidatorAddress, Vote, VoteHash};

type Fixture = (Vec<Vote>, Vec<(ValidatorAddress, u128)>, Vec<AssetPair>);

fn fixture(validators: usize, pairs: usize) -> Fixture {
    let pair_list: Vec<AssetPair> = (0..pairs)
        .map(|i| AssetPair::new(&format!("tok{i}"), "usd").expect("valid pair"))
        .collect();
    let mut set = Vec::with_capacity(validators);
    let mut votes = Vec::with_capacity(validators);
    for v in 0..validators {
        let voter = ValidatorAddress::new(format!("pvvaloper_v{v:04}"));
        let tuples = pair_list
            .iter()
            .enumerate()
            .map(|(i, p)| format!("({p},{}.{:02})", 1000 + i, (v * 7) % 100))
            .collect::<Vec<_>>()
            .join("|")
            .parse()
            .expect("valid tuples");
        votes.push(Vote {
            exchange_rate_tuples: tuples,
            voter: voter.clone(),
            salt: "bench".into(),
            submit_block: 10,
            commitment: VoteHash::ZERO,
        });
        set.push((voter, 1 + (v as u128 % 13)));
    }
    (votes, set, pair_list)
}

fn tally_bench(c: &mut Criterion) {
    let engine = TallyEngine {
        vote_threshold_bps: 5_000,
        reward_band_bps: 200,
    };
    let (votes, validators, pairs) = fixture(150, 20);

    c.bench_function("tally_150_validators_20_pairs", |b| {
        b.iter(|| engine.tally(black_box(&votes), black_box(&validators), &pairs))
    });
}

criterion_group!(benches, tally_bench);
criterion_main!(benches);
