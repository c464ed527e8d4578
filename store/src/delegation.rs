//! `feeder_delegation[validator] -> account`.

use crate::StoreError;
use pricevote_types::{AccountAddress, ValidatorAddress};

pub trait FeederDelegationStore {
    fn get_feeder_delegation(
        &self,
        validator: &ValidatorAddress,
    ) -> Result<Option<AccountAddress>, StoreError>;

    fn put_feeder_delegation(
        &self,
        validator: &ValidatorAddress,
        feeder: &AccountAddress,
    ) -> Result<(), StoreError>;

    fn delete_feeder_delegation(&self, validator: &ValidatorAddress) -> Result<(), StoreError>;

    fn iter_feeder_delegations(&self)
        -> Result<Vec<(ValidatorAddress, AccountAddress)>, StoreError>;
}
