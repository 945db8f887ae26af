//! # Runtime Integration Tests
//!
//! The HTTP controllers of `bridge-runtime` over a container wired with an
//! in-memory ledger the test can drive.

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use bridge_runtime::http::{build_router, AppState};
    use bridge_runtime::{BridgeConfig, BridgeContainer};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use vb_01_ledger_sync::{InMemoryCacheStore, InMemoryLedger, LedgerClient, LedgerElection};
    use vb_02_wallet_auth::test_helpers::{generate_key, personal_sign, wallet_address};

    fn wired() -> (Arc<InMemoryLedger>, Router) {
        let ledger = Arc::new(InMemoryLedger::new());
        let config = BridgeConfig::for_testing();
        let cors = config.cors.clone();
        let container =
            BridgeContainer::assemble(config, ledger.clone(), Arc::new(InMemoryCacheStore::new()));
        let router = build_router(
            AppState {
                sync: container.sync.clone(),
                auth: container.auth.clone(),
            },
            &cors,
        );
        (ledger, router)
    }

    fn election(options: &[&str], end_time: u64) -> LedgerElection {
        LedgerElection {
            name: "Board".into(),
            description: "Annual board vote".into(),
            start_time: 1_600_000_000,
            end_time,
            options: options.iter().map(|o| o.to_string()).collect(),
            finalized: false,
        }
    }

    async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_election_lifecycle_over_http() {
        let (ledger, router) = wired();
        let far_future = 4_000_000_000;
        ledger.push(election(&["A", "B"], far_future));

        let (status, body) = call(&router, Method::POST, "/api/blockchain/sync", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCount"], 1);
        assert_eq!(body["syncedCount"], 1);
        assert_eq!(body["details"][0]["status"], "created");

        let (_, rows) = call(&router, Method::GET, "/api/results/0", None).await;
        assert_eq!(rows, json!([]));

        ledger.set_results(0, vec![3, 7]);
        ledger.finalize(0).await.unwrap();

        let (_, body) = call(&router, Method::POST, "/api/blockchain/sync", None).await;
        assert_eq!(body["details"][0]["status"], "updated");

        let (_, rows) = call(&router, Method::GET, "/api/results/0", None).await;
        assert_eq!(
            rows,
            json!([
                {"electionId": 0, "optionIndex": 0, "optionName": "A", "voteCount": 3},
                {"electionId": 0, "optionIndex": 1, "optionName": "B", "voteCount": 7}
            ])
        );

        let (_, body) = call(&router, Method::POST, "/api/blockchain/sync", None).await;
        assert_eq!(body["syncedCount"], 0);
        assert_eq!(body["details"][0]["status"], "no_changes");

        let (_, body) = call(&router, Method::POST, "/api/blockchain/sync-all-results", None).await;
        assert_eq!(body["details"][0]["status"], "results_synced");

        let (_, status_body) = call(&router, Method::GET, "/api/blockchain/status", None).await;
        assert_eq!(status_body["electionCount"], 1);
    }

    #[tokio::test]
    async fn test_wallet_login_over_http() {
        let (_, router) = wired();
        let key = generate_key();
        let address = wallet_address(&key);

        let (status, body) = call(
            &router,
            Method::GET,
            &format!("/api/wallet/challenge?walletAddress={address}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let challenge = body["challenge"].as_str().unwrap().to_owned();
        assert!(challenge.starts_with("Verify your identity for TestRealm."));

        let request = json!({
            "walletAddress": address,
            "challenge": challenge,
            "signature": personal_sign(&challenge, &key),
        });
        let (status, body) = call(&router, Method::POST, "/api/wallet/verify", Some(request.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isNewUser"], true);

        // Replaying the same signed challenge fails.
        let (status, body) = call(&router, Method::POST, "/api/wallet/verify", Some(request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid signature");
    }
}
