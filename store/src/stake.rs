//! Read-only view of the external staking module.

use pricevote_types::ValidatorAddress;

/// Source of the bonded validator set and its stake weights.
pub trait ValidatorSet {
    /// Bonded validators with their voting power, ordered by address.
    /// Validators with zero power may be omitted.
    fn bonded_validators(&self) -> Vec<(ValidatorAddress, u128)>;

    /// Power of a single validator; zero when not bonded.
    fn power_of(&self, validator: &ValidatorAddress) -> u128 {
        self.bonded_validators()
            .into_iter()
            .find(|(v, _)| v == validator)
            .map(|(_, power)| power)
            .unwrap_or(0)
    }
}
