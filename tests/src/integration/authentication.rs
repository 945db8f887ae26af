//! # Authentication Integration Tests
//!
//! Real secp256k1 keys through `ChallengeRegistry`, `EthereumSignatureVerifier`,
//! and `WalletAuthService`.

#[cfg(test)]
mod tests {
    use shared_types::ManualTimeSource;
    use std::sync::Arc;
    use std::time::Duration;
    use vb_02_wallet_auth::test_helpers::{generate_key, personal_sign, wallet_address};
    use vb_02_wallet_auth::{
        AuthError, ChallengeAuthApi, ChallengeConfig, ChallengeRegistry, ChallengeSweeper,
        EthereumSignatureVerifier, IdentityKey, InMemoryWalletRegistry, WalletAuthApi,
        WalletAuthService, WalletRegistry,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn registry() -> (Arc<ChallengeRegistry>, Arc<ManualTimeSource>) {
        let clock = Arc::new(ManualTimeSource::at_unix(1_700_000_000));
        let registry = Arc::new(ChallengeRegistry::with_clock(
            Arc::new(EthereumSignatureVerifier::new()),
            ChallengeConfig::default(),
            clock.clone(),
        ));
        (registry, clock)
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[test]
    fn test_wrong_signature_then_correct_signature() {
        let (registry, _) = registry();
        let key = generate_key();
        let address = wallet_address(&key);

        let challenge = registry.issue(&address);
        let wrong = personal_sign(&challenge, &generate_key());

        assert!(!registry.verify(&address, &challenge, &wrong));
        assert_eq!(registry.failed_attempts(&address), Some(1));

        assert!(registry.verify(&address, &challenge, &personal_sign(&challenge, &key)));
        assert_eq!(registry.pending_count(), 0);
    }

    #[test]
    fn test_verify_without_issue_is_rejected() {
        let (registry, _) = registry();
        let key = generate_key();
        let address = wallet_address(&key);

        assert!(!registry.verify(
            &address,
            "wrong-value",
            &personal_sign("wrong-value", &key)
        ));
        assert_eq!(registry.pending_count(), 0);
    }

    #[test]
    fn test_challenge_is_single_use() {
        let (registry, _) = registry();
        let key = generate_key();
        let address = wallet_address(&key);

        let challenge = registry.issue(&address);
        let signature = personal_sign(&challenge, &key);

        assert!(registry.verify(&address, &challenge, &signature));
        assert!(!registry.verify(&address, &challenge, &signature));
    }

    #[test]
    fn test_expired_challenge_is_rejected_and_evicted() {
        let (registry, clock) = registry();
        let key = generate_key();
        let address = wallet_address(&key);

        let challenge = registry.issue(&address);
        clock.advance(chrono::Duration::seconds(301));

        assert!(!registry.verify(&address, &challenge, &personal_sign(&challenge, &key)));
        assert_eq!(registry.failed_attempts(&address), None);
    }

    #[test]
    fn test_lockout_requires_new_challenge() {
        let (registry, _) = registry();
        let key = generate_key();
        let address = wallet_address(&key);
        let challenge = registry.issue(&address);

        for _ in 0..3 {
            assert!(!registry.verify(&address, &challenge, "0xdeadbeef"));
        }
        assert!(!registry.verify(&address, &challenge, &personal_sign(&challenge, &key)));
        assert_eq!(registry.pending_count(), 0);

        let fresh = registry.issue(&address);
        assert!(registry.verify(&address, &fresh, &personal_sign(&fresh, &key)));
    }

    #[test]
    fn test_malformed_signatures_count_as_failures() {
        let (registry, _) = registry();
        let address = wallet_address(&generate_key());
        let challenge = registry.issue(&address);

        for (attempt, garbage) in ["", "0x", "not-hex"].iter().enumerate() {
            assert!(!registry.verify(&address, &challenge, garbage));
            assert_eq!(registry.failed_attempts(&address), Some(attempt as u32 + 1));
        }
    }

    #[test]
    fn test_identities_do_not_interfere() {
        let (registry, _) = registry();
        let keys: Vec<_> = (0..16).map(|_| generate_key()).collect();

        let handles: Vec<_> = keys
            .into_iter()
            .map(|key| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    let address = wallet_address(&key);
                    let challenge = registry.issue(&address);
                    assert!(!registry.verify(&address, &challenge, "0x00"));
                    registry.verify(&address, &challenge, &personal_sign(&challenge, &key))
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(registry.pending_count(), 0);
    }

    // =============================================================================
    // AUTHENTICATION FLOW
    // =============================================================================

    #[tokio::test]
    async fn test_login_registers_wallet_once() {
        let (registry, _) = registry();
        let wallets = Arc::new(InMemoryWalletRegistry::new());
        let service = WalletAuthService::new(registry, wallets.clone());
        let key = generate_key();
        let address = wallet_address(&key);

        let mut outcomes = Vec::new();
        for _ in 0..2 {
            let challenge = service.request_challenge(&address).await.unwrap();
            let signature = personal_sign(&challenge, &key);
            outcomes.push(
                service
                    .authenticate(&address, &challenge, &signature)
                    .await
                    .unwrap()
                    .is_new_user,
            );
        }

        assert_eq!(outcomes, vec![true, false]);
        assert!(wallets
            .is_registered(&IdentityKey::new(&address))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_every_rejection_looks_the_same() {
        let (registry, clock) = registry();
        let service = WalletAuthService::new(registry, Arc::new(InMemoryWalletRegistry::new()));
        let key = generate_key();
        let address = wallet_address(&key);

        let never_issued = service.authenticate(&address, "text", "0x00").await;

        let challenge = service.request_challenge(&address).await.unwrap();
        let forged = service
            .authenticate(&address, &challenge, &personal_sign(&challenge, &generate_key()))
            .await;

        clock.advance(chrono::Duration::minutes(10));
        let expired = service
            .authenticate(&address, &challenge, &personal_sign(&challenge, &key))
            .await;

        for outcome in [never_issued, forged, expired] {
            assert_eq!(outcome, Err(AuthError::InvalidSignature));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_clears_abandoned_challenges() {
        let (registry, clock) = registry();
        for _ in 0..5 {
            registry.issue(&wallet_address(&generate_key()));
        }

        let sweeper = ChallengeSweeper::start(registry.clone(), Duration::from_secs(60));
        clock.advance(chrono::Duration::seconds(301));
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert_eq!(registry.pending_count(), 0);
        sweeper.stop().await;
    }
}
