//! # Vote-Bridge Benchmarks
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | vb-02 Wallet Auth | personal_sign recovery | < 1ms |
//! | vb-02 Wallet Auth | issue + verify | < 1ms |
//! | vb-01 Ledger Sync | steady-state pass, 100 elections | < 10ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use vb_01_ledger_sync::{
    InMemoryCacheStore, InMemoryLedger, LedgerElection, LedgerSyncApi, LedgerSyncService,
};
use vb_02_wallet_auth::domain::ecdsa::recover_personal_signer;
use vb_02_wallet_auth::test_helpers::{generate_key, personal_sign, wallet_address};
use vb_02_wallet_auth::{
    ChallengeAuthApi, ChallengeConfig, ChallengeRegistry, EthereumSignatureVerifier,
};

// ============================================================================
// VB-02: Wallet Authentication
// ============================================================================

fn bench_signature_recovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("vb-02-signature-recovery");
    group.measurement_time(Duration::from_secs(10));

    let key = generate_key();
    let message = "Verify your identity for VotingSystem. Nonce: 01";
    let signature = personal_sign(message, &key);

    group.bench_function("recover_personal_signer", |b| {
        b.iter(|| black_box(recover_personal_signer(black_box(message), &signature).is_ok()))
    });

    group.finish();
}

fn bench_challenge_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("vb-02-challenge");

    let registry = ChallengeRegistry::new(
        Arc::new(EthereumSignatureVerifier::new()),
        ChallengeConfig::default(),
    );
    let key = generate_key();
    let address = wallet_address(&key);

    group.bench_function("issue_sign_verify", |b| {
        b.iter(|| {
            let challenge = registry.issue(&address);
            let signature = personal_sign(&challenge, &key);
            black_box(registry.verify(&address, &challenge, &signature))
        })
    });

    group.bench_function("issue_only", |b| {
        b.iter(|| black_box(registry.issue(&address)))
    });

    group.finish();
}

// ============================================================================
// VB-01: Ledger Synchronization
// ============================================================================

fn ledger_with(count: usize) -> Arc<InMemoryLedger> {
    let elections = (0..count)
        .map(|i| LedgerElection {
            name: format!("Election {i}"),
            description: String::new(),
            start_time: 1_600_000_000,
            end_time: 4_000_000_000,
            options: vec!["Yes".into(), "No".into(), "Abstain".into()],
            finalized: false,
        })
        .collect();
    Arc::new(InMemoryLedger::with_elections(elections))
}

fn bench_reconciliation_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("vb-01-reconciliation");
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    for size in [10usize, 100, 500] {
        let ledger = ledger_with(size);
        group.throughput(Throughput::Elements(size as u64));

        // Every election is new: all inserts.
        group.bench_with_input(BenchmarkId::new("cold_pass", size), &ledger, |b, ledger| {
            b.iter(|| {
                let service =
                    LedgerSyncService::new(ledger.clone(), Arc::new(InMemoryCacheStore::new()));
                runtime.block_on(async { black_box(service.synchronize_all().await.is_ok()) })
            })
        });

        // Cache already matches the ledger: no writes.
        let warm = LedgerSyncService::new(ledger.clone(), Arc::new(InMemoryCacheStore::new()));
        let _ = runtime.block_on(warm.synchronize_all());
        group.bench_function(BenchmarkId::new("steady_state_pass", size), |b| {
            b.iter(|| {
                runtime.block_on(async {
                    let report = warm.synchronize_all().await;
                    black_box(report.map(|r| r.synced_count).unwrap_or_default())
                })
            })
        });
    }

    group.finish();
}

criterion_group!(
    wallet_auth,
    bench_signature_recovery,
    bench_challenge_round_trip
);
criterion_group!(ledger_sync, bench_reconciliation_pass);
criterion_main!(wallet_auth, ledger_sync);
