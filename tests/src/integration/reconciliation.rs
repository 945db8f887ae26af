//! # Reconciliation Integration Tests
//!
//! Drives `LedgerSyncService` end to end against the in-memory ledger and
//! cache (and RocksDB with `--features rocksdb`).
//!
//! ## Covered
//!
//! 1. First sight of an election creates the cache row, no results
//! 2. Ledger finalization flows into the cache with exact result rows
//! 3. A repeated pass reports `no_changes` and writes nothing
//! 4. Result row count is `min(options, tallies)` for every finalized election
//! 5. `finalized` survives stale ledger reads
//! 6. Overlapping passes converge; readers never see a half-replaced tally

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use shared_types::ManualTimeSource;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use vb_01_ledger_sync::{
        CachedElection, ElectionCacheStore, ElectionId, InMemoryCacheStore, InMemoryLedger,
        LedgerClient, LedgerElection, LedgerSyncApi, LedgerSyncService, ResultRow, StoreError,
        SyncStatus,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const NOW: u64 = 1_700_000_000;

    /// Cache store that counts mutating calls.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryCacheStore,
        upserts: AtomicUsize,
        replaces: AtomicUsize,
    }

    impl CountingStore {
        fn writes(&self) -> (usize, usize) {
            (
                self.upserts.load(Ordering::SeqCst),
                self.replaces.load(Ordering::SeqCst),
            )
        }
    }

    #[async_trait]
    impl ElectionCacheStore for CountingStore {
        async fn find(&self, id: ElectionId) -> Result<Option<CachedElection>, StoreError> {
            self.inner.find(id).await
        }

        async fn upsert(&self, election: CachedElection) -> Result<(), StoreError> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            self.inner.upsert(election).await
        }

        async fn list(&self) -> Result<Vec<CachedElection>, StoreError> {
            self.inner.list().await
        }

        async fn results(&self, id: ElectionId) -> Result<Vec<ResultRow>, StoreError> {
            self.inner.results(id).await
        }

        async fn delete_result_rows(&self, id: ElectionId) -> Result<usize, StoreError> {
            self.inner.delete_result_rows(id).await
        }

        async fn insert_result_row(&self, row: ResultRow) -> Result<(), StoreError> {
            self.inner.insert_result_row(row).await
        }

        async fn replace_results(
            &self,
            id: ElectionId,
            rows: Vec<ResultRow>,
        ) -> Result<(), StoreError> {
            self.replaces.fetch_add(1, Ordering::SeqCst);
            self.inner.replace_results(id, rows).await
        }
    }

    struct Bridge {
        ledger: Arc<InMemoryLedger>,
        store: Arc<CountingStore>,
        clock: Arc<ManualTimeSource>,
        service: Arc<LedgerSyncService>,
    }

    fn bridge() -> Bridge {
        let ledger = Arc::new(InMemoryLedger::new());
        let store = Arc::new(CountingStore::default());
        let clock = Arc::new(ManualTimeSource::at_unix(NOW));
        let service = Arc::new(LedgerSyncService::with_clock(
            ledger.clone(),
            store.clone(),
            clock.clone(),
        ));
        Bridge {
            ledger,
            store,
            clock,
            service,
        }
    }

    fn election(name: &str, options: &[&str], end_time: u64, finalized: bool) -> LedgerElection {
        LedgerElection {
            name: name.into(),
            description: format!("{name} ballot"),
            start_time: NOW - 86_400,
            end_time,
            options: options.iter().map(|o| o.to_string()).collect(),
            finalized,
        }
    }

    fn row(index: u32, name: &str, votes: u64) -> ResultRow {
        ResultRow {
            election_id: 0,
            option_index: index,
            option_name: name.into(),
            vote_count: votes,
        }
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[tokio::test]
    async fn test_new_open_election_is_created_without_results() {
        let b = bridge();
        b.ledger
            .push(election("Board", &["A", "B"], NOW + 86_400, false));

        let report = b.service.synchronize_all().await.unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["syncedCount"], 1);
        assert_eq!(json["details"][0]["id"], 0);
        assert_eq!(json["details"][0]["status"], "created");
        assert!(b.store.results(0).await.unwrap().is_empty());
        assert!(!b.store.find(0).await.unwrap().unwrap().finalized);
    }

    #[tokio::test]
    async fn test_ledger_finalization_flows_into_cache() {
        let b = bridge();
        b.ledger
            .push(election("Board", &["A", "B"], NOW + 86_400, false));
        b.service.synchronize_all().await.unwrap();

        b.ledger
            .replace(0, election("Board", &["A", "B"], NOW + 86_400, true))
            .unwrap();
        b.ledger.set_results(0, vec![3, 7]);

        let report = b.service.synchronize_all().await.unwrap();

        assert_eq!(report.status_of(0), Some(SyncStatus::Updated));
        assert!(report.result_errors.is_empty());
        assert!(b.store.find(0).await.unwrap().unwrap().finalized);
        assert_eq!(
            b.store.results(0).await.unwrap(),
            vec![row(0, "A", 3), row(1, "B", 7)]
        );
    }

    #[tokio::test]
    async fn test_second_pass_is_idempotent() {
        let b = bridge();
        b.ledger.push(election("Board", &["A", "B"], NOW - 60, true));
        b.ledger.set_results(0, vec![3, 7]);
        b.ledger
            .push(election("Budget", &["Yes", "No"], NOW + 3_600, false));
        b.ledger.push(election("Chair", &["X"], NOW - 60, false));

        let first = b.service.synchronize_all().await.unwrap();
        assert_eq!(first.synced_count, 3);
        let writes_after_first = b.store.writes();

        let second = b.service.synchronize_all().await.unwrap();

        assert_eq!(second.total_count, 3);
        assert_eq!(second.synced_count, 0);
        assert!(second
            .details
            .iter()
            .all(|d| d.status == SyncStatus::NoChanges));
        assert_eq!(b.store.writes(), writes_after_first);
    }

    #[tokio::test]
    async fn test_result_rows_match_shorter_side() {
        let b = bridge();
        let cases: [(&[&str], Vec<u64>, usize); 3] = [
            (&["A", "B", "C"], vec![1, 2], 2),
            (&["A", "B"], vec![1, 2, 3, 4], 2),
            (&["Only"], vec![9], 1),
        ];
        for (options, counts, _) in &cases {
            let id = b.ledger.push(election("E", options, NOW - 60, true));
            b.ledger.set_results(id, counts.clone());
        }

        b.service.synchronize_all().await.unwrap();

        for (id, (_, _, expected)) in cases.iter().enumerate() {
            let id = id as ElectionId;
            assert!(b.store.find(id).await.unwrap().unwrap().finalized);
            assert_eq!(b.store.results(id).await.unwrap().len(), *expected);
        }
    }

    #[tokio::test]
    async fn test_election_closing_triggers_result_check_only() {
        let b = bridge();
        b.ledger.push(election("Board", &["A", "B"], NOW + 60, false));
        b.service.synchronize_all().await.unwrap();

        // Voting closes but nobody has finalized on-chain.
        b.clock.advance(chrono::Duration::seconds(120));
        let report = b.service.synchronize_all().await.unwrap();

        assert_eq!(report.status_of(0), Some(SyncStatus::NoChanges));
        assert!(report.result_errors.is_empty());
        assert!(b.store.results(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stale_read_never_unfinalizes() {
        let b = bridge();
        b.ledger.push(election("Board", &["A", "B"], NOW - 60, true));
        b.ledger.set_results(0, vec![5, 5]);
        b.service.synchronize_all().await.unwrap();

        b.ledger
            .replace(0, election("Board", &["A", "B"], NOW - 60, false))
            .unwrap();
        let report = b.service.synchronize_all().await.unwrap();

        assert_eq!(report.status_of(0), Some(SyncStatus::NoChanges));
        assert!(b.store.find(0).await.unwrap().unwrap().finalized);
        assert_eq!(b.store.results(0).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_faults_are_isolated_per_election() {
        let b = bridge();
        for name in ["First", "Second", "Third"] {
            b.ledger.push(election(name, &["A"], NOW + 60, false));
        }
        b.ledger.set_election_unreachable(1, true);

        let report = b.service.synchronize_all().await.unwrap();

        assert_eq!(report.total_count, 3);
        assert_eq!(report.synced_count, 2);
        assert_eq!(report.status_of(1), Some(SyncStatus::Error));
        assert!(report.details[1].error.is_some());
        assert!(b.store.find(1).await.unwrap().is_none());
        assert!(b.store.find(2).await.unwrap().is_some());

        b.ledger.set_election_unreachable(1, false);
        let retry = b.service.synchronize_all().await.unwrap();
        assert_eq!(retry.status_of(1), Some(SyncStatus::Created));
    }

    #[tokio::test]
    async fn test_unreadable_count_aborts_without_writes() {
        let b = bridge();
        b.ledger.push(election("Board", &["A"], NOW + 60, false));
        b.ledger.set_count_unreachable(true);

        let err = b.service.synchronize_all().await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(b.store.writes(), (0, 0));
    }

    #[tokio::test]
    async fn test_operator_finalize_then_result_sync() {
        let b = bridge();
        b.ledger.push(election("Board", &["A", "B"], NOW - 60, false));
        b.ledger.set_results(0, vec![4, 6]);
        b.service.synchronize_all().await.unwrap();

        let tx = b.ledger.finalize(0).await.unwrap();
        assert!(tx.starts_with("0x"));

        let outcome = b.service.synchronize_results(0).await.unwrap();
        assert_eq!(outcome.status(), SyncStatus::ResultsSynced);
        assert_eq!(
            b.service.cached_results(0).await.unwrap(),
            vec![row(0, "A", 4), row(1, "B", 6)]
        );
    }

    // =============================================================================
    // CONCURRENCY
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_overlapping_passes_converge() {
        let b = bridge();
        for i in 0..20u64 {
            let id = b
                .ledger
                .push(election(&format!("E{i}"), &["A", "B"], NOW - 60, i % 2 == 0));
            b.ledger.set_results(id, vec![i, i * 2]);
        }

        let (first, second) = tokio::join!(
            tokio::spawn({
                let service = b.service.clone();
                async move { service.synchronize_all().await }
            }),
            tokio::spawn({
                let service = b.service.clone();
                async move { service.synchronize_all().await }
            }),
        );
        first.unwrap().unwrap();
        second.unwrap().unwrap();

        let settled = b.service.synchronize_all().await.unwrap();
        assert!(settled
            .details
            .iter()
            .all(|d| d.status == SyncStatus::NoChanges));

        for i in 0..20u64 {
            let cached = b.store.find(i).await.unwrap().unwrap();
            assert_eq!(cached.finalized, i % 2 == 0);
            let rows = b.store.results(i).await.unwrap();
            if i % 2 == 0 {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[1].vote_count, i * 2);
            } else {
                assert!(rows.is_empty());
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_readers_never_see_partial_tally() {
        let b = bridge();
        b.ledger.push(election("Board", &["A", "B"], NOW - 60, true));
        b.ledger.set_results(0, vec![1, 1]);
        b.service.synchronize_results(0).await.unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let reader = tokio::spawn({
            let store = b.store.clone();
            let done = done.clone();
            async move {
                let mut reads = 0usize;
                while !done.load(Ordering::SeqCst) {
                    let rows = store.results(0).await.unwrap();
                    assert_eq!(rows.len(), 2, "observed a partial result set");
                    reads += 1;
                    tokio::task::yield_now().await;
                }
                reads
            }
        });

        for round in 0..200u64 {
            b.ledger.set_results(0, vec![round, round + 1]);
            b.service.synchronize_results(0).await.unwrap();
        }
        done.store(true, Ordering::SeqCst);

        assert!(reader.await.unwrap() > 0);
        assert_eq!(b.store.results(0).await.unwrap()[1].vote_count, 200);
    }

    // =============================================================================
    // PERSISTENT STORE
    // =============================================================================

    #[cfg(feature = "rocksdb")]
    #[tokio::test]
    async fn test_rocksdb_cache_survives_reopen() {
        use vb_01_ledger_sync::RocksDbCacheStore;

        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(InMemoryLedger::new());
        let clock = Arc::new(ManualTimeSource::at_unix(NOW));
        ledger.push(election("Board", &["A", "B"], NOW - 60, true));
        ledger.set_results(0, vec![3, 7]);

        {
            let store = Arc::new(RocksDbCacheStore::open(dir.path(), false).unwrap());
            let service = LedgerSyncService::with_clock(ledger.clone(), store, clock.clone());
            let report = service.synchronize_all().await.unwrap();
            assert_eq!(report.status_of(0), Some(SyncStatus::Created));
        }

        let store = Arc::new(RocksDbCacheStore::open(dir.path(), false).unwrap());
        assert!(store.find(0).await.unwrap().unwrap().finalized);
        assert_eq!(
            store.results(0).await.unwrap(),
            vec![row(0, "A", 3), row(1, "B", 7)]
        );

        let service = LedgerSyncService::with_clock(ledger, store, clock);
        let again = service.synchronize_all().await.unwrap();
        assert_eq!(again.status_of(0), Some(SyncStatus::NoChanges));
    }
}
