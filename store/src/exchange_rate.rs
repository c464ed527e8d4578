//! `rate[pair] -> AggregatedExchangeRate`.

use crate::StoreError;
use pricevote_types::{AggregatedExchangeRate, AssetPair};

pub trait ExchangeRateStore {
    fn get_exchange_rate(
        &self,
        pair: &AssetPair,
    ) -> Result<Option<AggregatedExchangeRate>, StoreError>;

    /// Overwrite the published rate for `rate.pair`.
    fn put_exchange_rate(&self, rate: &AggregatedExchangeRate) -> Result<(), StoreError>;

    fn delete_exchange_rate(&self, pair: &AssetPair) -> Result<(), StoreError>;

    /// All published rates, ordered by pair.
    fn iter_exchange_rates(&self) -> Result<Vec<AggregatedExchangeRate>, StoreError>;
}
