//! `miss_counter[validator] -> u64`.

use crate::StoreError;
use pricevote_types::ValidatorAddress;

pub trait MissCounterStore {
    /// Missing entries read as zero.
    fn get_miss_counter(&self, validator: &ValidatorAddress) -> Result<u64, StoreError>;

    fn put_miss_counter(&self, validator: &ValidatorAddress, count: u64) -> Result<(), StoreError>;

    fn delete_miss_counter(&self, validator: &ValidatorAddress) -> Result<(), StoreError>;

    /// All non-deleted counters, ordered by validator.
    fn iter_miss_counters(&self) -> Result<Vec<(ValidatorAddress, u64)>, StoreError>;
}
