//! Pair whitelist and feeder delegation.
//!
//! Both registries are read-mostly views over the store. The oracle core treats
//! a resolved feeder as already authorized; the node checks authorization at
//! the submission boundary.

use crate::error::OracleError;
use pricevote_store::{FeederDelegationStore, PairWhitelistStore};
use pricevote_types::{AccountAddress, AssetPair, ValidatorAddress};
use std::collections::BTreeSet;

/// The set of asset pairs currently eligible for voting.
pub struct PairRegistry;

impl PairRegistry {
    pub fn is_whitelisted<S: PairWhitelistStore>(
        &self,
        store: &S,
        pair: &AssetPair,
    ) -> Result<bool, OracleError> {
        Ok(store.is_whitelisted(pair)?)
    }

    /// Whitelisted pairs in canonical order.
    pub fn active_pairs<S: PairWhitelistStore>(
        &self,
        store: &S,
    ) -> Result<Vec<AssetPair>, OracleError> {
        Ok(store.iter_pairs()?)
    }

    pub fn add_pair<S: PairWhitelistStore>(
        &self,
        store: &S,
        pair: &AssetPair,
    ) -> Result<(), OracleError> {
        Ok(store.insert_pair(pair)?)
    }

    /// Remove a pair. Its last published rate is kept; votes on it are
    /// ignored from the next tally on.
    pub fn remove_pair<S: PairWhitelistStore>(
        &self,
        store: &S,
        pair: &AssetPair,
    ) -> Result<(), OracleError> {
        Ok(store.remove_pair(pair)?)
    }

    /// Replace the whitelist with `pairs`. Returns whether anything changed.
    pub fn apply_whitelist<S: PairWhitelistStore>(
        &self,
        store: &S,
        pairs: &[AssetPair],
    ) -> Result<bool, OracleError> {
        let current: BTreeSet<AssetPair> = store.iter_pairs()?.into_iter().collect();
        let wanted: BTreeSet<AssetPair> = pairs.iter().cloned().collect();
        if current == wanted {
            return Ok(false);
        }
        for removed in current.difference(&wanted) {
            store.remove_pair(removed)?;
        }
        for added in wanted.difference(&current) {
            store.insert_pair(added)?;
        }
        Ok(true)
    }
}

/// Validator → delegate feeder mapping.
pub struct FeederRegistry;

impl FeederRegistry {
    /// The account allowed to submit for `validator`; its own account unless delegated.
    pub fn authorized_feeder<S: FeederDelegationStore>(
        &self,
        store: &S,
        validator: &ValidatorAddress,
    ) -> Result<AccountAddress, OracleError> {
        Ok(store
            .get_feeder_delegation(validator)?
            .unwrap_or_else(|| validator.account()))
    }

    pub fn is_authorized<S: FeederDelegationStore>(
        &self,
        store: &S,
        validator: &ValidatorAddress,
        feeder: &AccountAddress,
    ) -> Result<bool, OracleError> {
        Ok(self.authorized_feeder(store, validator)? == *feeder)
    }

    /// Delegate feeding rights. Delegating to the validator's own account
    /// removes the delegation entry.
    pub fn delegate_feeder<S: FeederDelegationStore>(
        &self,
        store: &S,
        validator: &ValidatorAddress,
        feeder: &AccountAddress,
    ) -> Result<(), OracleError> {
        if *feeder == validator.account() {
            store.delete_feeder_delegation(validator)?;
        } else {
            store.put_feeder_delegation(validator, feeder)?;
        }
        Ok(())
    }
}
