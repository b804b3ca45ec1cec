//! Test registry - all test cases are registered here

pub mod helpers;

use crate::runner::TestCase;

/// Build and return all test cases
///
/// Each test queues what the backend should answer, sends a request to the
/// REAL proxy, then checks both the proxy's answer and what the backend saw.
pub fn all_tests() -> Vec<TestCase> {
    macro_rules! test {
        ($name:expr, $desc:expr, $func:path) => {
            TestCase {
                name: $name,
                description: $desc,
                run: Box::new(|ctx| Box::pin($func(ctx))),
            }
        };
    }

    vec![
        // ── Method guard ──────────────────────────────────────────────────────
        test!(
            "guard/non_post_rejected",
            "GET/PUT/DELETE/PATCH get 405 with a fixed error body",
            relay::test_non_post_rejected
        ),
        test!(
            "guard/no_backend_call",
            "Rejected methods never reach the backend",
            relay::test_rejected_methods_not_forwarded
        ),

        // ── Relay ─────────────────────────────────────────────────────────────
        test!(
            "relay/success",
            "Backend JSON is relayed verbatim with status 200",
            relay::test_success_relayed
        ),
        test!(
            "relay/backend_error_status",
            "Backend non-2xx JSON body is still relayed with status 200",
            relay::test_backend_error_status_relayed
        ),
        test!(
            "relay/body_passthrough",
            "Inbound body reaches the backend unchanged with Content-Type: application/json",
            relay::test_body_passthrough
        ),
        test!(
            "relay/key_order",
            "Object keys keep their order in both directions",
            relay::test_key_order_kept
        ),
        test!(
            "relay/both_routes",
            "/predict and /api/predict behave the same",
            relay::test_both_routes
        ),
        test!(
            "relay/idempotent",
            "The same request twice yields identical answers",
            relay::test_idempotent
        ),

        // ── Failure mapping ───────────────────────────────────────────────────
        test!(
            "failure/non_json_backend",
            "A non-JSON backend body becomes 500 with the fixed error body",
            relay::test_non_json_backend
        ),
        test!(
            "failure/non_json_request",
            "A non-JSON request body becomes 500 and is not forwarded",
            relay::test_non_json_request
        ),

        // ── Local endpoints ───────────────────────────────────────────────────
        test!(
            "health/local",
            "/health is answered by the proxy itself",
            health::test_health_local
        ),
    ]
}
