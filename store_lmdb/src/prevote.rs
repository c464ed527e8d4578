//! LMDB implementation of PrevoteStore.

use pricevote_store::{PrevoteStore, StoreError};
use pricevote_types::{Prevote, ValidatorAddress};

use crate::LmdbOracleStore;

impl PrevoteStore for LmdbOracleStore {
    fn get_prevote(&self, voter: &ValidatorAddress) -> Result<Option<Prevote>, StoreError> {
        Ok(self.get_record(self.prevotes_db, voter.as_str().as_bytes())?)
    }

    fn put_prevote(&self, prevote: &Prevote) -> Result<(), StoreError> {
        Ok(self.put_record(self.prevotes_db, prevote.voter.as_str().as_bytes(), prevote)?)
    }

    fn delete_prevote(&self, voter: &ValidatorAddress) -> Result<(), StoreError> {
        Ok(self.delete_key(self.prevotes_db, voter.as_str().as_bytes())?)
    }

    fn iter_prevotes(&self) -> Result<Vec<Prevote>, StoreError> {
        Ok(self.iter_records(self.prevotes_db)?)
    }
}
