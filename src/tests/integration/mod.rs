//! HTTP integration tests
//!
//! Drive the complete route stack with warp test requests: payer page,
//! webhook reconciliation, polling and info endpoints, in the same
//! sequences the external collaborators produce.

use serde_json::Value;

use crate::domain::session::PaymentStatus;
use crate::tests::common::{fixtures, TestHarness};
use crate::tests::config;

const ORDER: &str = "1700000001";
const WEBHOOK_PATH: &str = "/webhook/bank-transaction";

fn body_json(response: &warp::http::Response<bytes::Bytes>) -> Value {
    serde_json::from_slice(response.body()).expect("response body must be JSON")
}

async fn deliver_webhook(
    harness: &TestHarness,
    transaction_id: &str,
    order_id: &str,
    amount: i64,
) -> warp::http::Response<bytes::Bytes> {
    let payload = fixtures::webhook_payload(transaction_id, order_id, amount);
    let mut request = warp::test::request()
        .method("POST")
        .path(WEBHOOK_PATH)
        .body(payload.to_string());

    if let Some(secret) = &harness.config.security.webhook_secret {
        request = request.header("x-casso-signature", fixtures::webhook_signature(&payload, secret));
    }

    request.reply(&harness.routes()).await
}

#[tokio::test]
async fn test_full_payment_flow_exact_amount() {
    let harness = TestHarness::new(config::test_config());
    let token = harness
        .envelope
        .seal(&fixtures::request_data(ORDER, 50000, "monthly_fund"))
        .unwrap();

    // Payer opens the link: session materializes pending
    let response = warp::test::request()
        .path(&format!("/pay?signature={}", token))
        .reply(&harness.routes())
        .await;
    assert_eq!(response.status(), 200);
    let view = body_json(&response);
    assert_eq!(view["status"], "pending");
    assert_eq!(view["order_id"], ORDER);
    assert!(view["qr_url"].as_str().unwrap().contains("img.vietqr.io"));

    // Bank reports the exact amount
    let response = deliver_webhook(&harness, "T1", ORDER, 50000).await;
    assert_eq!(response.status(), 200);
    let body = body_json(&response);
    assert_eq!(body["status"], "success");
    assert_eq!(body["amount_mismatch"], false);
    assert_eq!(body["split_payment"], false);

    // Poll sees paid with the success redirect
    let response = warp::test::request()
        .path(&format!("/api/payment-status/{}", ORDER))
        .reply(&harness.routes())
        .await;
    assert_eq!(response.status(), 200);
    let status = body_json(&response);
    assert_eq!(status["status"], "paid");
    assert!(status["return_url"].as_str().unwrap().contains("status=success"));

    // Payer revisits the link: redirect back to the originating service
    let response = warp::test::request()
        .path(&format!("/pay?signature={}", token))
        .reply(&harness.routes())
        .await;
    assert_eq!(response.status(), 302);
    let location = response.headers().get("location").unwrap().to_str().unwrap();
    assert!(location.starts_with("https://fund.example.com/result?order_id=1700000001&status=success"));
}

#[tokio::test]
async fn test_split_payment_flow_over_http() {
    let harness = TestHarness::new(config::test_config());
    let token = harness
        .envelope
        .seal(&fixtures::request_data(ORDER, 50000, "monthly_fund"))
        .unwrap();
    warp::test::request()
        .path(&format!("/pay?signature={}", token))
        .reply(&harness.routes())
        .await;

    let response = deliver_webhook(&harness, "T1", ORDER, 70000).await;
    assert_eq!(response.status(), 200);
    let body = body_json(&response);
    assert_eq!(body["amount_mismatch"], true);
    assert_eq!(body["split_payment"], true);
    assert_eq!(body["converted_to_donate"], false);

    // Parent info carries the split sub-object
    let response = warp::test::request()
        .path(&format!("/api/payment-info/{}", ORDER))
        .reply(&harness.routes())
        .await;
    let info = body_json(&response);
    assert_eq!(info["amount"], 50000);
    assert_eq!(info["payment_type"], "monthly_fund");
    assert_eq!(info["donate_split"]["order_id"], "1700000002");
    assert_eq!(info["donate_split"]["amount"], 20000);

    // The donate session is a first-class record
    let response = warp::test::request()
        .path("/api/payment-info/1700000002")
        .reply(&harness.routes())
        .await;
    let info = body_json(&response);
    assert_eq!(info["status"], "paid");
    assert_eq!(info["payment_type"], "donate");
    assert_eq!(info["amount"], 20000);

    // Poll redirect is augmented with the donation
    let response = warp::test::request()
        .path(&format!("/api/payment-status/{}", ORDER))
        .reply(&harness.routes())
        .await;
    let status = body_json(&response);
    let url = status["return_url"].as_str().unwrap();
    assert!(url.contains("donate_order_id=1700000002"));
    assert!(url.contains("donate_amount=20000"));
}

#[tokio::test]
async fn test_underpayment_converts_over_http() {
    let harness = TestHarness::new(config::test_config());
    let token = harness
        .envelope
        .seal(&fixtures::request_data(ORDER, 50000, "monthly_fund"))
        .unwrap();
    warp::test::request()
        .path(&format!("/pay?signature={}", token))
        .reply(&harness.routes())
        .await;

    let response = deliver_webhook(&harness, "T1", ORDER, 30000).await;
    let body = body_json(&response);
    assert_eq!(body["converted_to_donate"], true);
    assert_eq!(body["split_payment"], false);

    let session = harness.store.get(ORDER).await.unwrap().unwrap();
    assert_eq!(session.payment_type, "donate");
    assert_eq!(session.amount, 30000);
    assert!(harness.store.get("1700000002").await.unwrap().is_none());
}

#[tokio::test]
async fn test_webhook_idempotent_redelivery_and_conflict() {
    let harness = TestHarness::new(config::test_config());
    let token = harness
        .envelope
        .seal(&fixtures::request_data(ORDER, 50000, "monthly_fund"))
        .unwrap();
    warp::test::request()
        .path(&format!("/pay?signature={}", token))
        .reply(&harness.routes())
        .await;

    assert_eq!(deliver_webhook(&harness, "T1", ORDER, 50000).await.status(), 200);

    // Redelivery of the same transaction: success, no state change
    let response = deliver_webhook(&harness, "T1", ORDER, 50000).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_json(&response)["message"], "Already processed");

    // A different transaction must not overwrite the paid session
    let response = deliver_webhook(&harness, "T2", ORDER, 50000).await;
    assert_eq!(response.status(), 400);
    let session = harness.store.get(ORDER).await.unwrap().unwrap();
    assert_eq!(session.transaction_id.as_deref(), Some("T1"));
}

#[tokio::test]
async fn test_webhook_rejections() {
    let harness = TestHarness::new(config::test_config());
    let routes = harness.routes();
    let secret = harness.config.security.webhook_secret.clone().unwrap();

    // Invalid signature
    let payload = fixtures::webhook_payload("T1", ORDER, 50000);
    let response = warp::test::request()
        .method("POST")
        .path(WEBHOOK_PATH)
        .header("x-casso-signature", "t=123,v1=deadbeef")
        .body(payload.to_string())
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 401);

    // Missing signature header entirely
    let response = warp::test::request()
        .method("POST")
        .path(WEBHOOK_PATH)
        .body(payload.to_string())
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 401);

    // Broken JSON
    let response = warp::test::request()
        .method("POST")
        .path(WEBHOOK_PATH)
        .body("{not json")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 400);

    // Aggregator-reported error code
    let payload = serde_json::json!({"error": 5, "data": {"id": "T1", "amount": 1}});
    let response = warp::test::request()
        .method("POST")
        .path(WEBHOOK_PATH)
        .header("x-casso-signature", fixtures::webhook_signature(&payload, &secret))
        .body(payload.to_string())
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 400);

    // No matching session: 404 with the order id echoed
    let payload = fixtures::webhook_payload("T1", "1799999999", 50000);
    let response = warp::test::request()
        .method("POST")
        .path(WEBHOOK_PATH)
        .header("x-casso-signature", fixtures::webhook_signature(&payload, &secret))
        .body(payload.to_string())
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 404);
    assert_eq!(body_json(&response)["order_id"], "1799999999");

    // Description without an order reference
    let payload = serde_json::json!({
        "error": 0,
        "data": {"id": "T1", "description": "khong co ma", "amount": 50000}
    });
    let response = warp::test::request()
        .method("POST")
        .path(WEBHOOK_PATH)
        .header("x-casso-signature", fixtures::webhook_signature(&payload, &secret))
        .body(payload.to_string())
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_webhook_bypass_mode_without_secret() {
    let harness = TestHarness::new(config::bypass_config());
    let token = harness
        .envelope
        .seal(&fixtures::request_data(ORDER, 50000, "monthly_fund"))
        .unwrap();
    warp::test::request()
        .path(&format!("/pay?signature={}", token))
        .reply(&harness.routes())
        .await;

    // No signature header at all, and still accepted
    let response = deliver_webhook(&harness, "T1", ORDER, 50000).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        harness.store.get(ORDER).await.unwrap().unwrap().status,
        PaymentStatus::Paid
    );
}

#[tokio::test]
async fn test_payer_endpoint_token_failures() {
    let harness = TestHarness::new(config::test_config());
    let routes = harness.routes();

    let response = warp::test::request().path("/pay").reply(&routes).await;
    assert_eq!(response.status(), 400);
    assert_eq!(body_json(&response)["error_code"], "MISSING_SIGNATURE");

    let response = warp::test::request()
        .path("/pay?signature=AAAAtampered")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(body_json(&response)["error_code"], "INVALID_SIGNATURE");

    let mut expired = fixtures::request_data(ORDER, 50000, "monthly_fund");
    expired.expired_at = chrono::Utc::now().timestamp() - 10;
    let token = harness.envelope.seal(&expired).unwrap();
    let response = warp::test::request()
        .path(&format!("/pay?signature={}", token))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(body_json(&response)["error_code"], "EXPIRED_SIGNATURE");
}

#[tokio::test]
async fn test_status_poll_unknown_and_expiry() {
    let harness = TestHarness::new(config::test_config());

    let response = warp::test::request()
        .path(&format!("/api/payment-status/{}", ORDER))
        .reply(&harness.routes())
        .await;
    assert_eq!(response.status(), 404);

    // Create a session, then force its deadline into the past
    let token = harness
        .envelope
        .seal(&fixtures::request_data(ORDER, 50000, "monthly_fund"))
        .unwrap();
    warp::test::request()
        .path(&format!("/pay?signature={}", token))
        .reply(&harness.routes())
        .await;
    let mut session = harness.store.get(ORDER).await.unwrap().unwrap();
    session.expired_at = chrono::Utc::now() - chrono::Duration::seconds(5);
    harness.store.put(&session).await.unwrap();

    // The poll that observes the expiry flips the session and returns the
    // cancellation redirect
    let response = warp::test::request()
        .path(&format!("/api/payment-status/{}", ORDER))
        .reply(&harness.routes())
        .await;
    let status = body_json(&response);
    assert_eq!(status["status"], "expired");
    assert!(status["return_url"].as_str().unwrap().contains("status=cancelled"));
    assert_eq!(
        harness.store.get(ORDER).await.unwrap().unwrap().status,
        PaymentStatus::Expired
    );
}

#[tokio::test]
async fn test_rate_limit_on_polling() {
    let mut config = config::test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_minute = 60;
    config.rate_limit.burst_size = 2;
    let harness = TestHarness::new(config);
    let routes = harness.routes();

    let mut last_status = 0;
    for _ in 0..3 {
        let response = warp::test::request()
            .path(&format!("/api/payment-status/{}", ORDER))
            .header("x-forwarded-for", "203.0.113.7")
            .reply(&routes)
            .await;
        last_status = response.status().as_u16();
    }
    assert_eq!(last_status, 429);
}

#[tokio::test]
async fn test_health_and_metrics_endpoints() {
    let harness = TestHarness::new(config::test_config());
    let routes = harness.routes();

    let response = warp::test::request().path("/health").reply(&routes).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_json(&response)["status"], "healthy");

    harness.metrics.record_webhook_received();
    let response = warp::test::request().path("/metrics").reply(&routes).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_json(&response)["webhooks_received"], 1);
}
