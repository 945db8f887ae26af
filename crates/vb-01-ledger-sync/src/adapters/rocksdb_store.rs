//! # RocksDB Cache Store
//!
//! Durable `ElectionCacheStore`.
//!
//! ## Column Families
//!
//! - `elections` - `CachedElection` as JSON, keyed by big-endian election id
//! - `results` - `ResultRow` as JSON, keyed by big-endian `(election id, option index)`
//!
//! Result rows are deleted with a range tombstone over the election's key
//! prefix, so the delete covers whatever rows exist when the write lands.
//! `replace_results` puts that tombstone and the inserts into one
//! `WriteBatch`, so the swap is atomic on disk.

use crate::domain::entities::{CachedElection, ElectionId, ResultRow};
use crate::domain::errors::StoreError;
use crate::ports::outbound::ElectionCacheStore;
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;

/// Column family for election rows
pub const CF_ELECTIONS: &str = "elections";
/// Column family for result rows
pub const CF_RESULTS: &str = "results";

const COLUMN_FAMILIES: &[&str] = &[CF_ELECTIONS, CF_RESULTS];

/// RocksDB-backed cache store.
pub struct RocksDbCacheStore {
    db: DB,
    sync_writes: bool,
}

fn io(e: rocksdb::Error) -> StoreError {
    StoreError::Io(e.to_string())
}

fn election_key(id: ElectionId) -> [u8; 8] {
    id.to_be_bytes()
}

fn result_key(id: ElectionId, option_index: u32) -> [u8; 12] {
    let mut key = [0u8; 12];
    key[..8].copy_from_slice(&id.to_be_bytes());
    key[8..].copy_from_slice(&option_index.to_be_bytes());
    key
}

/// `[from, to)` covering every result key of `id`.
fn result_range(id: ElectionId) -> (Vec<u8>, Vec<u8>) {
    let mut to = election_key(id).to_vec();
    to.extend_from_slice(&[0xFF; 5]);
    (result_key(id, 0).to_vec(), to)
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

impl RocksDbCacheStore {
    /// Open or create the store at `path`.
    pub fn open(path: impl AsRef<Path>, sync_writes: bool) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect();

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors).map_err(io)?;
        Ok(Self { db, sync_writes })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Io(format!("missing column family {name}")))
    }

    fn write_opts(&self) -> rocksdb::WriteOptions {
        let mut opts = rocksdb::WriteOptions::default();
        opts.set_sync(self.sync_writes);
        opts
    }

    fn result_entries(&self, id: ElectionId) -> Result<Vec<(Vec<u8>, ResultRow)>, StoreError> {
        let cf = self.cf(CF_RESULTS)?;
        let prefix = election_key(id);
        let mut entries = Vec::new();
        for item in self
            .db
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward))
        {
            let (key, value) = item.map_err(io)?;
            if !key.starts_with(&prefix) {
                break;
            }
            entries.push((key.to_vec(), decode(&value)?));
        }
        Ok(entries)
    }
}

#[async_trait]
impl ElectionCacheStore for RocksDbCacheStore {
    async fn find(&self, id: ElectionId) -> Result<Option<CachedElection>, StoreError> {
        let cf = self.cf(CF_ELECTIONS)?;
        match self.db.get_cf(cf, election_key(id)).map_err(io)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, election: CachedElection) -> Result<(), StoreError> {
        let cf = self.cf(CF_ELECTIONS)?;
        self.db
            .put_cf_opt(cf, election_key(election.id), encode(&election)?, &self.write_opts())
            .map_err(io)
    }

    async fn list(&self) -> Result<Vec<CachedElection>, StoreError> {
        let cf = self.cf(CF_ELECTIONS)?;
        self.db
            .iterator_cf(cf, IteratorMode::Start)
            .map(|item| {
                let (_, value) = item.map_err(io)?;
                decode(&value)
            })
            .collect()
    }

    async fn results(&self, id: ElectionId) -> Result<Vec<ResultRow>, StoreError> {
        Ok(self
            .result_entries(id)?
            .into_iter()
            .map(|(_, row)| row)
            .collect())
    }

    async fn delete_result_rows(&self, id: ElectionId) -> Result<usize, StoreError> {
        let cf = self.cf(CF_RESULTS)?;
        let removed = self.result_entries(id)?.len();
        let (from, to) = result_range(id);
        let mut batch = WriteBatch::default();
        batch.delete_range_cf(cf, from, to);
        self.db.write_opt(batch, &self.write_opts()).map_err(io)?;
        Ok(removed)
    }

    async fn insert_result_row(&self, row: ResultRow) -> Result<(), StoreError> {
        let cf = self.cf(CF_RESULTS)?;
        let key = result_key(row.election_id, row.option_index);
        if self.db.get_pinned_cf(cf, key).map_err(io)?.is_some() {
            return Err(StoreError::DuplicateResultRow {
                election_id: row.election_id,
                option_index: row.option_index,
            });
        }
        self.db
            .put_cf_opt(cf, key, encode(&row)?, &self.write_opts())
            .map_err(io)
    }

    async fn replace_results(
        &self,
        id: ElectionId,
        rows: Vec<ResultRow>,
    ) -> Result<(), StoreError> {
        let cf = self.cf(CF_RESULTS)?;
        let mut batch = WriteBatch::default();

        let (from, to) = result_range(id);
        batch.delete_range_cf(cf, from, to);

        let mut seen = std::collections::HashSet::new();
        for row in rows {
            if !seen.insert(row.option_index) {
                return Err(StoreError::DuplicateResultRow {
                    election_id: id,
                    option_index: row.option_index,
                });
            }
            batch.put_cf(cf, result_key(id, row.option_index), encode(&row)?);
        }

        self.db.write_opt(batch, &self.write_opts()).map_err(io)
    }
}
