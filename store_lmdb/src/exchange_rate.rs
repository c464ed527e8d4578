//! LMDB implementation of ExchangeRateStore.

use pricevote_store::{ExchangeRateStore, StoreError};
use pricevote_types::{AggregatedExchangeRate, AssetPair};

use crate::LmdbOracleStore;

impl ExchangeRateStore for LmdbOracleStore {
    fn get_exchange_rate(
        &self,
        pair: &AssetPair,
    ) -> Result<Option<AggregatedExchangeRate>, StoreError> {
        Ok(self.get_record(self.exchange_rates_db, pair.as_str().as_bytes())?)
    }

    fn put_exchange_rate(&self, rate: &AggregatedExchangeRate) -> Result<(), StoreError> {
        Ok(self.put_record(self.exchange_rates_db, rate.pair.as_str().as_bytes(), rate)?)
    }

    fn delete_exchange_rate(&self, pair: &AssetPair) -> Result<(), StoreError> {
        Ok(self.delete_key(self.exchange_rates_db, pair.as_str().as_bytes())?)
    }

    fn iter_exchange_rates(&self) -> Result<Vec<AggregatedExchangeRate>, StoreError> {
        Ok(self.iter_records(self.exchange_rates_db)?)
    }
}
