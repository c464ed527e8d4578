use proptest::prelude::*;

use pricevote_types::{AssetPair, ExchangeRateTuple, ExchangeRateTuples, OracleParams, VoteHash};
use rust_decimal::Decimal;

fn denom() -> impl Strategy<Value = String> {
    "[a-z]{2,6}"
}

fn tuple() -> impl Strategy<Value = ExchangeRateTuple> {
    (denom(), denom(), 0i64..10_000_000, 0u32..8).prop_map(|(base, quote, mantissa, scale)| {
        ExchangeRateTuple::new(
            AssetPair::new(&base, &quote).unwrap(),
            Decimal::new(mantissa, scale),
        )
    })
}

proptest! {
    /// Displayed tuples parse back to the same tuples, so commitments computed
    /// over the text are stable.
    #[test]
    fn tuples_text_is_stable(tuples in prop::collection::vec(tuple(), 1..6)) {
        let tuples = ExchangeRateTuples::new(tuples);
        let text = tuples.to_string();
        let parsed: ExchangeRateTuples = text.parse().unwrap();
        prop_assert_eq!(&parsed, &tuples);
        prop_assert_eq!(parsed.to_string(), text);
    }

    /// latest_by_pair never holds more entries than distinct pairs in the input.
    #[test]
    fn latest_by_pair_is_deduplicated(tuples in prop::collection::vec(tuple(), 1..12)) {
        let tuples = ExchangeRateTuples::new(tuples);
        let distinct: std::collections::BTreeSet<_> = tuples.iter().map(|t| t.pair.clone()).collect();
        prop_assert_eq!(tuples.latest_by_pair().len(), distinct.len());
    }

    /// Pair ordering agrees with the canonical string ordering.
    #[test]
    fn pair_ordering_matches_string(a in denom(), b in denom(), c in denom(), d in denom()) {
        let p = AssetPair::new(&a, &b).unwrap();
        let q = AssetPair::new(&c, &d).unwrap();
        prop_assert_eq!(p.cmp(&q), p.to_string().cmp(&q.to_string()));
    }

    /// VoteHash hex text parses back to the same hash.
    #[test]
    fn vote_hash_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = VoteHash::new(bytes);
        let parsed: VoteHash = hash.to_string().parse().unwrap();
        prop_assert_eq!(parsed, hash);
    }

    /// Exactly one block per period is the period's last block.
    #[test]
    fn one_last_block_per_period(vote_period in 1u64..50, period in 0u64..1_000) {
        let params = OracleParams { vote_period, ..Default::default() };
        let first = period * vote_period;
        let last_blocks = (first..first + vote_period)
            .filter(|h| params.is_period_last_block(*h))
            .count();
        prop_assert_eq!(last_blocks, 1);
        prop_assert_eq!(params.period_of(first + vote_period - 1), period);
    }
}
