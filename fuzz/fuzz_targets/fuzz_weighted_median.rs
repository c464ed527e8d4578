#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use pricevote_oracle::{Ballot, BallotEntry};
use pricevote_types::{AssetPair, Decimal, ValidatorAddress};

#[derive(Debug, Arbitrary)]
struct Report {
    mantissa: u32,
    scale: u8,
    power: u64,
}

// The weighted median of any non-empty ballot is one of its rates.
fuzz_target!(|reports: Vec<Report>| {
    let entries: Vec<BallotEntry> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| r.mantissa > 0 && r.power > 0)
        .map(|(i, r)| BallotEntry {
            voter: ValidatorAddress::new(format!("pvvaloper_v{i}")),
            rate: Decimal::new(i64::from(r.mantissa), u32::from(r.scale % 18)),
            power: u128::from(r.power),
        })
        .collect();

    let ballot = Ballot::new(AssetPair::must_parse("btc:usd"), entries.clone());
    match ballot.weighted_median() {
        Some(median) => assert!(entries.iter().any(|e| e.rate == median)),
        None => assert!(entries.is_empty()),
    }
});
