//! Commit-reveal vote commitments.
//!
//! A feeder commits to `Blake2b-256("{salt}:{tuples}:{voter}")` one period
//! before revealing the tuples and salt. The tuples are hashed in their
//! canonical text form (see [`ExchangeRateTuples`]).

use crate::hash::{blake2b_256, blake2b_256_multi};
use pricevote_types::{ExchangeRateTuples, ValidatorAddress, VoteHash};

/// Longest salt accepted with a reveal.
pub const MAX_SALT_LEN: usize = 64;

/// Compute the commitment for a set of tuples.
pub fn vote_hash(salt: &str, tuples: &ExchangeRateTuples, voter: &ValidatorAddress) -> VoteHash {
    let tuples = tuples.to_string();
    VoteHash::new(blake2b_256_multi(&[
        salt.as_bytes(),
        b":",
        tuples.as_bytes(),
        b":",
        voter.as_str().as_bytes(),
    ]))
}

/// Whether `hash` commits to exactly these tuples, salt and voter.
pub fn verify_vote_hash(
    hash: &VoteHash,
    salt: &str,
    tuples: &ExchangeRateTuples,
    voter: &ValidatorAddress,
) -> bool {
    vote_hash(salt, tuples, voter) == *hash
}

/// Derive a per-period salt from a feeder secret.
///
/// Feeders that keep no state between commit and reveal can recompute the
/// same salt in the reveal period.
pub fn derive_salt(secret: &[u8], voter: &ValidatorAddress, period: u64) -> String {
    let digest = blake2b_256(
        &[secret, voter.as_str().as_bytes(), &period.to_be_bytes()].concat(),
    );
    hex::encode(&digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voter() -> ValidatorAddress {
        ValidatorAddress::new("pvvaloper_alice")
    }

    fn tuples(text: &str) -> ExchangeRateTuples {
        text.parse().unwrap()
    }

    #[test]
    fn commitment_verifies() {
        let t = tuples("(btc:usd,100.0)|(eth:usd,2000)");
        let hash = vote_hash("salt1", &t, &voter());
        assert!(verify_vote_hash(&hash, "salt1", &t, &voter()));
    }

    #[test]
    fn commitment_binds_every_input() {
        let t = tuples("(btc:usd,100.0)");
        let hash = vote_hash("salt1", &t, &voter());
        assert!(!verify_vote_hash(&hash, "salt2", &t, &voter()));
        assert!(!verify_vote_hash(&hash, "salt1", &tuples("(btc:usd,100.1)"), &voter()));
        assert!(!verify_vote_hash(
            &hash,
            "salt1",
            &t,
            &ValidatorAddress::new("pvvaloper_bob")
        ));
    }

    #[test]
    fn commitment_depends_on_decimal_scale() {
        // 100 and 100.0 are equal decimals but distinct reveals.
        let a = vote_hash("s", &tuples("(btc:usd,100)"), &voter());
        let b = vote_hash("s", &tuples("(btc:usd,100.0)"), &voter());
        assert_ne!(a, b);
    }

    #[test]
    fn derived_salt_is_stable_per_period() {
        let a = derive_salt(b"secret", &voter(), 7);
        assert_eq!(a, derive_salt(b"secret", &voter(), 7));
        assert_ne!(a, derive_salt(b"secret", &voter(), 8));
        assert_eq!(a.len(), 16);
        assert!(a.len() <= MAX_SALT_LEN);
    }

    #[test]
    fn derived_salt_is_lowercase_hex_of_digest_prefix() {
        let salt = derive_salt(b"secret", &voter(), 7);
        assert!(salt.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        let bytes = hex::decode(&salt).unwrap();
        let digest = blake2b_256(
            &[&b"secret"[..], voter().as_str().as_bytes(), &7u64.to_be_bytes()].concat(),
        );
        assert_eq!(bytes, digest[..8]);
    }
}
