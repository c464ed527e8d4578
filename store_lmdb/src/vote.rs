//! LMDB implementation of VoteStore.

use pricevote_store::{StoreError, VoteStore};
use pricevote_types::{ValidatorAddress, Vote};

use crate::LmdbOracleStore;

impl VoteStore for LmdbOracleStore {
    fn get_vote(&self, voter: &ValidatorAddress) -> Result<Option<Vote>, StoreError> {
        Ok(self.get_record(self.votes_db, voter.as_str().as_bytes())?)
    }

    fn put_vote(&self, vote: &Vote) -> Result<(), StoreError> {
        Ok(self.put_record(self.votes_db, vote.voter.as_str().as_bytes(), vote)?)
    }

    fn delete_vote(&self, voter: &ValidatorAddress) -> Result<(), StoreError> {
        Ok(self.delete_key(self.votes_db, voter.as_str().as_bytes())?)
    }

    fn iter_votes(&self) -> Result<Vec<Vote>, StoreError> {
        Ok(self.iter_records(self.votes_db)?)
    }
}
