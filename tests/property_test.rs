//! Property-based tests for intake invariants.
//!
//! Replays randomly generated call sessions against a fresh service and
//! checks that the store and notification log agree with what was sent.

use callintake_core::time::iso_timestamp;
use callintake_testing::{
    strategies::{webhook_session_strategy, WebhookAction},
    Clock, Invariants, TestEnv,
};
use proptest::{prelude::*, test_runner::Config as ProptestConfig};
use serde_json::{json, Map, Value};

/// Creates property test configuration based on environment.
///
/// `PROPTEST_CASES` overrides the number of cases.
fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES").ok().and_then(|s| s.parse().ok()).unwrap_or(16);

    ProptestConfig::with_cases(cases)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime")
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Every `save_data` call becomes exactly one record and one
    /// notification, in order, with ids `1..=N`.
    #[test]
    fn sessions_persist_every_save(actions in webhook_session_strategy(12)) {
        let (document, log, now) = runtime().block_on(async {
            let env = TestEnv::new().expect("failed to create test environment");
            let now = iso_timestamp(env.clock.now_system());

            for action in &actions {
                let response = env.post_webhook(&action.payload()).await.expect("request failed");
                assert!(response.status.is_success(), "{action:?} was rejected: {:?}", response.body);
            }

            let document = env.document().await.expect("failed to load document");
            let log = env.notifications().await.expect("failed to read log").unwrap_or_default();
            (document, log, now)
        });

        let submitted: Vec<Map<String, Value>> = actions
            .iter()
            .filter_map(|action| match action {
                WebhookAction::Save(arguments) => Some(arguments.clone()),
                _ => None,
            })
            .collect();

        prop_assert!(Invariants::sequential_ids(&document).is_ok());
        prop_assert!(Invariants::timestamps_present(&document).is_ok());
        prop_assert!(
            Invariants::matches_submissions(&document, &submitted).is_ok(),
            "store does not match submissions"
        );
        prop_assert!(
            document.patients.iter().all(|record| record.timestamp == now),
            "caller-supplied timestamps must be replaced"
        );
        prop_assert_eq!(log.matches("NEW PATIENT CALL").count(), submitted.len());
    }

    /// Sessions without `save_data` calls never touch disk.
    #[test]
    fn non_save_sessions_have_no_side_effects(actions in webhook_session_strategy(8)) {
        let actions: Vec<WebhookAction> = actions
            .into_iter()
            .filter(|action| !matches!(action, WebhookAction::Save(_)))
            .collect();

        let (data_exists, log) = runtime().block_on(async {
            let env = TestEnv::new().expect("failed to create test environment");

            for action in &actions {
                let response = env.post_webhook(&action.payload()).await.expect("request failed");
                let expected = match action {
                    WebhookAction::Lifecycle(payload) => json!({"status": payload["event"]}),
                    _ => json!({"status": "received"}),
                };
                assert_eq!(response.body, expected);
            }

            (env.data_path().exists(), env.notifications().await.expect("failed to read log"))
        });

        prop_assert!(!data_exists);
        prop_assert_eq!(log, None);
    }
}
