//! Nullable validator set: a programmable stand-in for the staking module.

use pricevote_store::ValidatorSet;
use pricevote_types::ValidatorAddress;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory bonded validator set.
#[derive(Default)]
pub struct NullValidatorSet {
    powers: Mutex<BTreeMap<ValidatorAddress, u128>>,
}

impl NullValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(validator, power)` pairs.
    pub fn with_powers(powers: impl IntoIterator<Item = (ValidatorAddress, u128)>) -> Self {
        Self {
            powers: Mutex::new(powers.into_iter().collect()),
        }
    }

    /// Bond (or re-weight) a validator.
    pub fn set_power(&self, validator: &ValidatorAddress, power: u128) {
        self.powers.lock().unwrap().insert(validator.clone(), power);
    }

    /// Remove a validator from the bonded set.
    pub fn unbond(&self, validator: &ValidatorAddress) {
        self.powers.lock().unwrap().remove(validator);
    }
}

impl ValidatorSet for NullValidatorSet {
    fn bonded_validators(&self) -> Vec<(ValidatorAddress, u128)> {
        self.powers
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, power)| **power > 0)
            .map(|(v, p)| (v.clone(), *p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_power_is_not_bonded() {
        let alice = ValidatorAddress::new("pvvaloper_alice");
        let bob = ValidatorAddress::new("pvvaloper_bob");
        let set = NullValidatorSet::with_powers([(alice.clone(), 10), (bob.clone(), 0)]);
        assert_eq!(set.bonded_validators(), vec![(alice.clone(), 10)]);
        assert_eq!(set.power_of(&bob), 0);

        set.unbond(&alice);
        assert!(set.bonded_validators().is_empty());
    }
}
