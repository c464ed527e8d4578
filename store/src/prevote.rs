//! Commit store: `prevote[voter] -> Prevote`.

use crate::StoreError;
use pricevote_types::{Prevote, ValidatorAddress};

pub trait PrevoteStore {
    fn get_prevote(&self, voter: &ValidatorAddress) -> Result<Option<Prevote>, StoreError>;

    /// Insert or replace the voter's prevote.
    fn put_prevote(&self, prevote: &Prevote) -> Result<(), StoreError>;

    fn delete_prevote(&self, voter: &ValidatorAddress) -> Result<(), StoreError>;

    /// All prevotes, ordered by voter.
    fn iter_prevotes(&self) -> Result<Vec<Prevote>, StoreError>;
}
