//! Integration tests for the authorization gate in front of the lifecycle
//! engine, using real signed credentials.

use chrono::Duration;
use maker_checker_core::{
    AuthorizationGate, CheckerError, JwtIdentityProvider, LifecycleConfig, RequestStatus,
};
use maker_checker_testing::{alice, bearer, bob, in_memory_lifecycle, jwt_provider, test_clock};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

fn gate(clock: &maker_checker_testing::FixedClock) -> AuthorizationGate<JwtIdentityProvider> {
    AuthorizationGate::new(jwt_provider(clock))
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_gated_submit_stamps_caller_as_maker() {
    let clock = test_clock();
    let gate = gate(&clock);
    let engine = in_memory_lifecycle(&clock, LifecycleConfig::default());
    let cancel = CancellationToken::new();

    let header = bearer(&alice(), &clock);
    let request = gate
        .guard(Some(&header), &cancel, |caller| {
            let (engine, cancel) = (&engine, &cancel);
            async move { engine.submit_request(&caller, "bob", "hello", cancel).await }
        })
        .await
        .unwrap();

    assert_eq!(request.maker_id, "alice");
    assert_eq!(request.status, RequestStatus::Pending);
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_full_flow_through_gate() {
    let clock = test_clock();
    let gate = gate(&clock);
    let engine = in_memory_lifecycle(&clock, LifecycleConfig::default());
    let cancel = CancellationToken::new();

    let maker = gate
        .authenticate(Some(&bearer(&alice(), &clock)), &cancel)
        .await
        .unwrap();
    let checker = gate
        .authenticate(Some(&bearer(&bob(), &clock)), &cancel)
        .await
        .unwrap();

    let request = engine
        .submit_request(&maker, &checker.id, "hello", &cancel)
        .await
        .unwrap();
    let resolved = engine
        .resolve_request(&checker, &request.id, RequestStatus::Approved, &cancel)
        .await
        .unwrap();
    assert_eq!(resolved.status, RequestStatus::Approved);
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_rejected_credentials_never_reach_the_operation() {
    let clock = test_clock();
    let gate = gate(&clock);
    let cancel = CancellationToken::new();
    let invocations = AtomicUsize::new(0);

    let expired = {
        let issued_at = test_clock();
        issued_at.advance(Duration::hours(-3));
        bearer(&alice(), &issued_at)
    };
    let foreign = {
        let other = JwtIdentityProvider::new(
            maker_checker_core::CredentialConfig::new("another-key"),
            std::sync::Arc::new(clock.clone()),
        );
        format!("Bearer {}", other.issue(&alice()).unwrap())
    };
    let valid = bearer(&alice(), &clock);
    let lowercase_scheme = valid.replacen("Bearer", "bearer", 1);
    let bare_token = valid.trim_start_matches("Bearer ").to_string();

    let headers: Vec<Option<&str>> = vec![
        None,
        Some(""),
        Some(&bare_token),
        Some(&lowercase_scheme),
        Some("Bearer not-a-jwt"),
        Some(&expired),
        Some(&foreign),
    ];

    for header in headers {
        let result: maker_checker_core::Result<()> = gate
            .guard(header, &cancel, |_| async {
                invocations.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;
        assert!(
            matches!(result, Err(CheckerError::Unauthenticated(_))),
            "{header:?} -> {result:?}"
        );
    }

    assert_eq!(invocations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_credential_expires_with_clock() {
    let clock = test_clock();
    let gate = gate(&clock);
    let cancel = CancellationToken::new();
    let header = bearer(&alice(), &clock);

    clock.advance(Duration::minutes(119));
    assert!(gate.authenticate(Some(&header), &cancel).await.is_ok());

    clock.advance(Duration::minutes(2));
    let result = gate.authenticate(Some(&header), &cancel).await;
    assert!(matches!(result, Err(CheckerError::Unauthenticated(_))));
}
