//! Nullable store: thread-safe in-memory oracle storage for testing.

use pricevote_store::{
    ExchangeRateStore, FeederDelegationStore, MissCounterStore, PairWhitelistStore,
    PrevoteStore, StoreError, VoteStore,
};
use pricevote_types::{
    AccountAddress, AggregatedExchangeRate, AssetPair, Prevote, ValidatorAddress, Vote,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// An in-memory implementation of every oracle table.
///
/// Ordered maps keep iteration deterministic, matching the LMDB backend.
#[derive(Default)]
pub struct NullOracleStore {
    prevotes: Mutex<BTreeMap<ValidatorAddress, Prevote>>,
    votes: Mutex<BTreeMap<ValidatorAddress, Vote>>,
    miss_counters: Mutex<BTreeMap<ValidatorAddress, u64>>,
    rates: Mutex<BTreeMap<AssetPair, AggregatedExchangeRate>>,
    feeders: Mutex<BTreeMap<ValidatorAddress, AccountAddress>>,
    whitelist: Mutex<BTreeSet<AssetPair>>,
}

impl NullOracleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given pairs whitelisted.
    pub fn with_whitelist(pairs: impl IntoIterator<Item = AssetPair>) -> Self {
        let store = Self::new();
        store.whitelist.lock().unwrap().extend(pairs);
        store
    }
}

impl PrevoteStore for NullOracleStore {
    fn get_prevote(&self, voter: &ValidatorAddress) -> Result<Option<Prevote>, StoreError> {
        Ok(self.prevotes.lock().unwrap().get(voter).cloned())
    }

    fn put_prevote(&self, prevote: &Prevote) -> Result<(), StoreError> {
        self.prevotes
            .lock()
            .unwrap()
            .insert(prevote.voter.clone(), prevote.clone());
        Ok(())
    }

    fn delete_prevote(&self, voter: &ValidatorAddress) -> Result<(), StoreError> {
        self.prevotes.lock().unwrap().remove(voter);
        Ok(())
    }

    fn iter_prevotes(&self) -> Result<Vec<Prevote>, StoreError> {
        Ok(self.prevotes.lock().unwrap().values().cloned().collect())
    }
}

impl VoteStore for NullOracleStore {
    fn get_vote(&self, voter: &ValidatorAddress) -> Result<Option<Vote>, StoreError> {
        Ok(self.votes.lock().unwrap().get(voter).cloned())
    }

    fn put_vote(&self, vote: &Vote) -> Result<(), StoreError> {
        self.votes
            .lock()
            .unwrap()
            .insert(vote.voter.clone(), vote.clone());
        Ok(())
    }

    fn delete_vote(&self, voter: &ValidatorAddress) -> Result<(), StoreError> {
        self.votes.lock().unwrap().remove(voter);
        Ok(())
    }

    fn iter_votes(&self) -> Result<Vec<Vote>, StoreError> {
        Ok(self.votes.lock().unwrap().values().cloned().collect())
    }
}

impl MissCounterStore for NullOracleStore {
    fn get_miss_counter(&self, validator: &ValidatorAddress) -> Result<u64, StoreError> {
        Ok(self
            .miss_counters
            .lock()
            .unwrap()
            .get(validator)
            .copied()
            .unwrap_or(0))
    }

    fn put_miss_counter(&self, validator: &ValidatorAddress, count: u64) -> Result<(), StoreError> {
        self.miss_counters
            .lock()
            .unwrap()
            .insert(validator.clone(), count);
        Ok(())
    }

    fn delete_miss_counter(&self, validator: &ValidatorAddress) -> Result<(), StoreError> {
        self.miss_counters.lock().unwrap().remove(validator);
        Ok(())
    }

    fn iter_miss_counters(&self) -> Result<Vec<(ValidatorAddress, u64)>, StoreError> {
        Ok(self
            .miss_counters
            .lock()
            .unwrap()
            .iter()
            .map(|(v, c)| (v.clone(), *c))
            .collect())
    }
}

impl ExchangeRateStore for NullOracleStore {
    fn get_exchange_rate(
        &self,
        pair: &AssetPair,
    ) -> Result<Option<AggregatedExchangeRate>, StoreError> {
        Ok(self.rates.lock().unwrap().get(pair).cloned())
    }

    fn put_exchange_rate(&self, rate: &AggregatedExchangeRate) -> Result<(), StoreError> {
        self.rates
            .lock()
            .unwrap()
            .insert(rate.pair.clone(), rate.clone());
        Ok(())
    }

    fn delete_exchange_rate(&self, pair: &AssetPair) -> Result<(), StoreError> {
        self.rates.lock().unwrap().remove(pair);
        Ok(())
    }

    fn iter_exchange_rates(&self) -> Result<Vec<AggregatedExchangeRate>, StoreError> {
        Ok(self.rates.lock().unwrap().values().cloned().collect())
    }
}

impl FeederDelegationStore for NullOracleStore {
    fn get_feeder_delegation(
        &self,
        validator: &ValidatorAddress,
    ) -> Result<Option<AccountAddress>, StoreError> {
        Ok(self.feeders.lock().unwrap().get(validator).cloned())
    }

    fn put_feeder_delegation(
        &self,
        validator: &ValidatorAddress,
        feeder: &AccountAddress,
    ) -> Result<(), StoreError> {
        self.feeders
            .lock()
            .unwrap()
            .insert(validator.clone(), feeder.clone());
        Ok(())
    }

    fn delete_feeder_delegation(&self, validator: &ValidatorAddress) -> Result<(), StoreError> {
        self.feeders.lock().unwrap().remove(validator);
        Ok(())
    }

    fn iter_feeder_delegations(
        &self,
    ) -> Result<Vec<(ValidatorAddress, AccountAddress)>, StoreError> {
        Ok(self
            .feeders
            .lock()
            .unwrap()
            .iter()
            .map(|(v, f)| (v.clone(), f.clone()))
            .collect())
    }
}

impl PairWhitelistStore for NullOracleStore {
    fn is_whitelisted(&self, pair: &AssetPair) -> Result<bool, StoreError> {
        Ok(self.whitelist.lock().unwrap().contains(pair))
    }

    fn insert_pair(&self, pair: &AssetPair) -> Result<(), StoreError> {
        self.whitelist.lock().unwrap().insert(pair.clone());
        Ok(())
    }

    fn remove_pair(&self, pair: &AssetPair) -> Result<(), StoreError> {
        self.whitelist.lock().unwrap().remove(pair);
        Ok(())
    }

    fn iter_pairs(&self) -> Result<Vec<AssetPair>, StoreError> {
        Ok(self.whitelist.lock().unwrap().iter().cloned().collect())
    }

    fn clear_pairs(&self) -> Result<(), StoreError> {
        self.whitelist.lock().unwrap().clear();
        Ok(())
    }
}
