//! LMDB implementation of PairWhitelistStore.
//!
//! The whitelist is a key-only set: each pair is stored with an empty value.

use pricevote_store::{PairWhitelistStore, StoreError};
use pricevote_types::AssetPair;

use crate::{LmdbError, LmdbOracleStore};

impl PairWhitelistStore for LmdbOracleStore {
    fn is_whitelisted(&self, pair: &AssetPair) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let found = self
            .whitelist_db
            .get(&rtxn, pair.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        Ok(found.is_some())
    }

    fn insert_pair(&self, pair: &AssetPair) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.whitelist_db
            .put(&mut wtxn, pair.as_str().as_bytes(), &[])
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn remove_pair(&self, pair: &AssetPair) -> Result<(), StoreError> {
        Ok(self.delete_key(self.whitelist_db, pair.as_str().as_bytes())?)
    }

    fn iter_pairs(&self) -> Result<Vec<AssetPair>, StoreError> {
        self.iter_keys(self.whitelist_db)?
            .into_iter()
            .map(|key| {
                key.parse()
                    .map_err(|e: pricevote_types::TypesError| StoreError::Corruption(e.to_string()))
            })
            .collect()
    }

    fn clear_pairs(&self) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.whitelist_db.clear(&mut wtxn).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
