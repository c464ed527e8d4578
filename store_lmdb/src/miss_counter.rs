//! LMDB implementation of MissCounterStore.
//!
//! Counters are stored as little-endian `u64` values keyed by validator.

use pricevote_store::{MissCounterStore, StoreError};
use pricevote_types::ValidatorAddress;

use crate::{LmdbError, LmdbOracleStore};

fn decode_count(bytes: &[u8]) -> Result<u64, LmdbError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| LmdbError::Serialization("miss counter has unexpected byte length".into()))?;
    Ok(u64::from_le_bytes(arr))
}

impl MissCounterStore for LmdbOracleStore {
    fn get_miss_counter(&self, validator: &ValidatorAddress) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .miss_counters_db
            .get(&rtxn, validator.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => Ok(decode_count(bytes)?),
            None => Ok(0),
        }
    }

    fn put_miss_counter(&self, validator: &ValidatorAddress, count: u64) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.miss_counters_db
            .put(&mut wtxn, validator.as_str().as_bytes(), &count.to_le_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_miss_counter(&self, validator: &ValidatorAddress) -> Result<(), StoreError> {
        Ok(self.delete_key(self.miss_counters_db, validator.as_str().as_bytes())?)
    }

    fn iter_miss_counters(&self) -> Result<Vec<(ValidatorAddress, u64)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.miss_counters_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut counters = Vec::new();
        for entry in iter {
            let (key, val) = entry.map_err(LmdbError::from)?;
            let key = std::str::from_utf8(key).map_err(|e| LmdbError::Serialization(e.to_string()))?;
            let validator: ValidatorAddress = key
                .parse()
                .map_err(|e: pricevote_types::TypesError| LmdbError::Serialization(e.to_string()))?;
            counters.push((validator, decode_count(val)?));
        }
        Ok(counters)
    }
}
