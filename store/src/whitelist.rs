//! `pair_whitelist -> set<AssetPair>`.

use crate::StoreError;
use pricevote_types::AssetPair;

pub trait PairWhitelistStore {
    fn is_whitelisted(&self, pair: &AssetPair) -> Result<bool, StoreError>;

    fn insert_pair(&self, pair: &AssetPair) -> Result<(), StoreError>;

    fn remove_pair(&self, pair: &AssetPair) -> Result<(), StoreError>;

    /// Whitelisted pairs in canonical order.
    fn iter_pairs(&self) -> Result<Vec<AssetPair>, StoreError>;

    fn clear_pairs(&self) -> Result<(), StoreError>;
}
