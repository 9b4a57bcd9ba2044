//! Property tests for the request lifecycle engine.

#![allow(clippy::unwrap_used)]

use maker_checker_core::{
    CheckerError, LifecycleConfig, RequestFilter, RequestStatus,
};
use maker_checker_testing::properties::{any_status, raw_pagination, terminal_status};
use maker_checker_testing::{alice, bob, in_memory_lifecycle, test_clock};
use proptest::prelude::*;
use tokio_util::sync::CancellationToken;

const SEEDED: usize = 5;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn request_resolves_at_most_once(first in terminal_status(), second in any_status()) {
        let (id, outcome, stored) = tokio_test::block_on(async {
            let engine = in_memory_lifecycle(&test_clock(), LifecycleConfig::default());
            let cancel = CancellationToken::new();

            let request = engine
                .submit_request(&alice(), "bob", "hello", &cancel)
                .await
                .unwrap();
            engine
                .resolve_request(&bob(), &request.id, first, &cancel)
                .await
                .unwrap();

            let outcome = engine
                .resolve_request(&bob(), &request.id, second, &cancel)
                .await;
            let stored = engine.get_request(&bob(), &request.id, &cancel).await.unwrap();
            (request.id, outcome, stored.status)
        });

        prop_assert_eq!(
            outcome,
            Err(CheckerError::InvalidTransition { id: id, status: first })
        );
        prop_assert_eq!(stored, first);
    }

    #[test]
    fn any_raw_pagination_yields_a_valid_window(pagination in raw_pagination()) {
        let (ids, page) = tokio_test::block_on(async {
            let engine = in_memory_lifecycle(&test_clock(), LifecycleConfig::default());
            let cancel = CancellationToken::new();

            let mut ids = Vec::new();
            for n in 0..SEEDED {
                let request = engine
                    .submit_request(&alice(), "bob", &format!("payload {n}"), &cancel)
                    .await
                    .unwrap();
                ids.push(request.id);
            }

            let page = engine
                .list_requests(&alice(), RequestFilter::default(), pagination, &cancel)
                .await
                .unwrap();
            (ids, page.into_iter().map(|r| r.id).collect::<Vec<_>>())
        });

        let skip = pagination
            .skip
            .and_then(|skip| usize::try_from(skip).ok())
            .unwrap_or(0);
        let limit = pagination
            .limit
            .and_then(|limit| usize::try_from(limit).ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(30);

        let expected: Vec<_> = ids.into_iter().skip(skip).take(limit).collect();
        prop_assert_eq!(page, expected);
    }

    #[test]
    fn listed_requests_are_never_pending_without_status(pagination in raw_pagination()) {
        let statuses = tokio_test::block_on(async {
            let engine = in_memory_lifecycle(&test_clock(), LifecycleConfig::default());
            let cancel = CancellationToken::new();

            for desired in [None, Some(RequestStatus::Approved), Some(RequestStatus::Rejected)] {
                let request = engine
                    .submit_request(&alice(), "bob", "hello", &cancel)
                    .await
                    .unwrap();
                if let Some(desired) = desired {
                    engine
                        .resolve_request(&bob(), &request.id, desired, &cancel)
                        .await
                        .unwrap();
                }
            }

            engine
                .list_requests(
                    &bob(),
                    RequestFilter::default().with_target_id("bob"),
                    pagination,
                    &cancel,
                )
                .await
                .unwrap()
                .into_iter()
                .map(|r| r.status)
                .collect::<Vec<_>>()
        });

        prop_assert!(statuses.iter().all(|s| *s == RequestStatus::Approved));
    }
}
