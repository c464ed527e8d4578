//! Reveal store: `vote[voter] -> Vote`.

use crate::StoreError;
use pricevote_types::{ValidatorAddress, Vote};

pub trait VoteStore {
    fn get_vote(&self, voter: &ValidatorAddress) -> Result<Option<Vote>, StoreError>;

    fn put_vote(&self, vote: &Vote) -> Result<(), StoreError>;

    fn delete_vote(&self, voter: &ValidatorAddress) -> Result<(), StoreError>;

    /// All votes, ordered by voter.
    fn iter_votes(&self) -> Result<Vec<Vote>, StoreError>;
}
