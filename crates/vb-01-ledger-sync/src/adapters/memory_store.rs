//! # In-Memory Cache Store
//!
//! `ElectionCacheStore` backed by ordered maps behind a single `RwLock`.
//! `replace_results` runs its delete and inserts under one write guard, which
//! is the in-memory equivalent of a scoped transaction.

use crate::domain::entities::{CachedElection, ElectionId, ResultRow};
use crate::domain::errors::StoreError;
use crate::ports::outbound::ElectionCacheStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Default)]
struct CacheTables {
    elections: BTreeMap<ElectionId, CachedElection>,
    results: BTreeMap<(ElectionId, u32), ResultRow>,
}

impl CacheTables {
    fn delete_result_rows(&mut self, id: ElectionId) -> usize {
        let keys: Vec<_> = self
            .results
            .range((id, 0)..=(id, u32::MAX))
            .map(|(key, _)| *key)
            .collect();
        for key in &keys {
            self.results.remove(key);
        }
        keys.len()
    }

    fn insert_result_row(&mut self, row: ResultRow) -> Result<(), StoreError> {
        let key = (row.election_id, row.option_index);
        if self.results.contains_key(&key) {
            return Err(StoreError::DuplicateResultRow {
                election_id: row.election_id,
                option_index: row.option_index,
            });
        }
        self.results.insert(key, row);
        Ok(())
    }
}

/// Cache store for tests and single-process deployments.
#[derive(Default)]
pub struct InMemoryCacheStore {
    tables: RwLock<CacheTables>,
}

impl InMemoryCacheStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total result rows across all elections.
    pub fn result_row_count(&self) -> usize {
        self.tables.read().results.len()
    }
}

#[async_trait]
impl ElectionCacheStore for InMemoryCacheStore {
    async fn find(&self, id: ElectionId) -> Result<Option<CachedElection>, StoreError> {
        Ok(self.tables.read().elections.get(&id).cloned())
    }

    async fn upsert(&self, election: CachedElection) -> Result<(), StoreError> {
        self.tables.write().elections.insert(election.id, election);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<CachedElection>, StoreError> {
        Ok(self.tables.read().elections.values().cloned().collect())
    }

    async fn results(&self, id: ElectionId) -> Result<Vec<ResultRow>, StoreError> {
        Ok(self
            .tables
            .read()
            .results
            .range((id, 0)..=(id, u32::MAX))
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn delete_result_rows(&self, id: ElectionId) -> Result<usize, StoreError> {
        Ok(self.tables.write().delete_result_rows(id))
    }

    async fn insert_result_row(&self, row: ResultRow) -> Result<(), StoreError> {
        self.tables.write().insert_result_row(row)
    }

    async fn replace_results(
        &self,
        id: ElectionId,
        rows: Vec<ResultRow>,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        let previous: Vec<ResultRow> = tables
            .results
            .range((id, 0)..=(id, u32::MAX))
            .map(|(_, row)| row.clone())
            .collect();

        tables.delete_result_rows(id);
        for row in rows {
            if let Err(e) = tables.insert_result_row(row) {
                // Roll back to the previous row set before releasing the guard.
                tables.delete_result_rows(id);
                for old in previous {
                    tables.results.insert((old.election_id, old.option_index), old);
                }
                return Err(e);
            }
        }
        Ok(())
    }
}
