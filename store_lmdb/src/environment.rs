//! LMDB environment setup and shared record helpers.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::LmdbError;

/// Number of named databases the oracle uses.
const MAX_DBS: u32 = 6;

/// Default map size: 1 GiB. The oracle tables stay small since per-period
/// tables are cleared every period.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

/// Wraps the LMDB environment and its database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    prevotes_db: Database<Bytes, Bytes>,
    votes_db: Database<Bytes, Bytes>,
    miss_counters_db: Database<Bytes, Bytes>,
    exchange_rates_db: Database<Bytes, Bytes>,
    feeders_db: Database<Bytes, Bytes>,
    whitelist_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at `path`, creating the directory
    /// and every oracle database if missing.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // Safety: the environment is opened once per path by this process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let prevotes_db = env.create_database(&mut wtxn, Some("prevotes"))?;
        let votes_db = env.create_database(&mut wtxn, Some("votes"))?;
        let miss_counters_db = env.create_database(&mut wtxn, Some("miss_counters"))?;
        let exchange_rates_db = env.create_database(&mut wtxn, Some("exchange_rates"))?;
        let feeders_db = env.create_database(&mut wtxn, Some("feeder_delegations"))?;
        let whitelist_db = env.create_database(&mut wtxn, Some("pair_whitelist"))?;
        wtxn.commit()?;

        tracing::info!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            prevotes_db,
            votes_db,
            miss_counters_db,
            exchange_rates_db,
            feeders_db,
            whitelist_db,
        })
    }

    /// A store handle over every oracle table. Handles share the environment.
    pub fn oracle_store(&self) -> LmdbOracleStore {
        LmdbOracleStore {
            env: Arc::clone(&self.env),
            prevotes_db: self.prevotes_db,
            votes_db: self.votes_db,
            miss_counters_db: self.miss_counters_db,
            exchange_rates_db: self.exchange_rates_db,
            feeders_db: self.feeders_db,
            whitelist_db: self.whitelist_db,
        }
    }
}

/// Implements every `pricevote-store` trait; see the per-table modules.
#[derive(Clone)]
pub struct LmdbOracleStore {
    pub(crate) env: Arc<Env>,
    pub(crate) prevotes_db: Database<Bytes, Bytes>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
    pub(crate) miss_counters_db: Database<Bytes, Bytes>,
    pub(crate) exchange_rates_db: Database<Bytes, Bytes>,
    pub(crate) feeders_db: Database<Bytes, Bytes>,
    pub(crate) whitelist_db: Database<Bytes, Bytes>,
}

impl LmdbOracleStore {
    pub(crate) fn put_record<T: Serialize>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        value: &T,
    ) -> Result<(), LmdbError> {
        let bytes = bincode::serialize(value)?;
        let mut wtxn = self.env.write_txn()?;
        db.put(&mut wtxn, key, &bytes)?;
        wtxn.commit()?;
        Ok(())
    }

    pub(crate) fn get_record<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<Option<T>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match db.get(&rtxn, key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn delete_key(&self, db: Database<Bytes, Bytes>, key: &[u8]) -> Result<(), LmdbError> {
        let mut wtxn = self.env.write_txn()?;
        db.delete(&mut wtxn, key)?;
        wtxn.commit()?;
        Ok(())
    }

    /// Every record in key order.
    pub(crate) fn iter_records<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
    ) -> Result<Vec<T>, LmdbError> {
        Ok(self
            .iter_entries(db)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    /// Every (key, record) pair in key order.
    pub(crate) fn iter_entries<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
    ) -> Result<Vec<(String, T)>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let mut entries = Vec::new();
        for entry in db.iter(&rtxn)? {
            let (key, bytes) = entry?;
            entries.push((decode_key(key)?, bincode::deserialize(bytes)?));
        }
        Ok(entries)
    }

    /// Every key in order, decoded as UTF-8.
    pub(crate) fn iter_keys(&self, db: Database<Bytes, Bytes>) -> Result<Vec<String>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let mut keys = Vec::new();
        for entry in db.iter(&rtxn)? {
            let (key, _) = entry?;
            keys.push(decode_key(key)?);
        }
        Ok(keys)
    }
}

fn decode_key(key: &[u8]) -> Result<String, LmdbError> {
    std::str::from_utf8(key)
        .map(str::to_string)
        .map_err(|e| LmdbError::Serialization(e.to_string()))
}
