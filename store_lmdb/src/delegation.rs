//! LMDB implementation of FeederDelegationStore.

use pricevote_store::{FeederDelegationStore, StoreError};
use pricevote_types::{AccountAddress, ValidatorAddress};

use crate::LmdbOracleStore;

impl FeederDelegationStore for LmdbOracleStore {
    fn get_feeder_delegation(
        &self,
        validator: &ValidatorAddress,
    ) -> Result<Option<AccountAddress>, StoreError> {
        Ok(self.get_record(self.feeders_db, validator.as_str().as_bytes())?)
    }

    fn put_feeder_delegation(
        &self,
        validator: &ValidatorAddress,
        feeder: &AccountAddress,
    ) -> Result<(), StoreError> {
        Ok(self.put_record(self.feeders_db, validator.as_str().as_bytes(), feeder)?)
    }

    fn delete_feeder_delegation(&self, validator: &ValidatorAddress) -> Result<(), StoreError> {
        Ok(self.delete_key(self.feeders_db, validator.as_str().as_bytes())?)
    }

    fn iter_feeder_delegations(
        &self,
    ) -> Result<Vec<(ValidatorAddress, AccountAddress)>, StoreError> {
        let entries: Vec<(String, AccountAddress)> = self.iter_entries(self.feeders_db)?;
        entries
            .into_iter()
            .map(|(key, feeder)| {
                let validator: ValidatorAddress = key.parse().map_err(
                    |e: pricevote_types::TypesError| {
                        StoreError::Corruption(format!("feeder delegation key: {e}"))
                    },
                )?;
                Ok::<_, StoreError>((validator, feeder))
            })
            .collect()
    }
}
