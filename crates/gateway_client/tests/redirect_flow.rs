use bytes::Bytes;
use gateway_client::{
    auth::AuthContext,
    redirect::{
        PendingRedirectResult, RedirectHandshake, RedirectResultCode, WalletRedirectLauncher,
    },
    GatewayClient,
};
use secrecy::Secret;
use serde_json::json;
use url::Url;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

struct NoopLauncher;

impl WalletRedirectLauncher for NoopLauncher {
    fn launch(&self, _correlation_code: u64) {}
}

fn client_for(server: &MockServer) -> GatewayClient {
    let auth = AuthContext::new(
        Url::parse(&server.uri()).expect("mock server uri is a valid url"),
        Secret::new("fp_test".to_string()),
    )
    .with_paypal_enabled(true);
    GatewayClient::new(auth).expect("client construction")
}

#[tokio::test]
async fn authorized_redirect_creates_the_paypal_account() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_methods/paypal_accounts"))
        .and(body_partial_json(json!({
            "authorizationFingerprint": "fp_test",
            "paypalAccount": {
                "consentCode": "consent-abc",
                "correlationId": "corr-1"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "paypalAccounts": [{
                "nonce": "paypal-nonce",
                "description": "paypal",
                "details": {"email": "jane.doe@example.com"}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut handshake = RedirectHandshake::new();
    client.start_pay_with_paypal(&mut handshake, &NoopLauncher, 7);

    let account = client
        .finish_pay_with_paypal(
            &mut handshake,
            PendingRedirectResult {
                result_code: RedirectResultCode::Ok,
                payload: Bytes::from_static(
                    br#"{"consentCode": "consent-abc", "correlationId": "corr-1"}"#,
                ),
            },
        )
        .await
        .expect("authorized flow succeeds")
        .expect("authorized flow produces an account");

    assert_eq!(account.nonce, "paypal-nonce");
}

#[tokio::test]
async fn canceled_redirect_creates_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut handshake = RedirectHandshake::new();
    client.start_pay_with_paypal(&mut handshake, &NoopLauncher, 7);

    let account = client
        .finish_pay_with_paypal(
            &mut handshake,
            PendingRedirectResult {
                result_code: RedirectResultCode::Canceled,
                payload: Bytes::new(),
            },
        )
        .await
        .expect("cancellation is not a failure");

    assert!(account.is_none());
}

#[tokio::test]
async fn analytics_event_is_posted_with_the_fingerprint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analytics"))
        .and(body_partial_json(json!({
            "authorizationFingerprint": "fp_test",
            "_meta": {"integration": "custom"}
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let auth = AuthContext::new(
        Url::parse(&server.uri()).expect("mock server uri is a valid url"),
        Secret::new("fp_test".to_string()),
    )
    .with_analytics_url(
        Url::parse(&format!("{}/analytics", server.uri())).expect("analytics url"),
    );
    let client = GatewayClient::new(auth).expect("client construction");

    client
        .send_analytics_event("card.nonce-received", "custom")
        .await;
}

#[tokio::test]
async fn analytics_failures_are_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analytics"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let auth = AuthContext::new(
        Url::parse(&server.uri()).expect("mock server uri is a valid url"),
        Secret::new("fp_test".to_string()),
    )
    .with_analytics_url(
        Url::parse(&format!("{}/analytics", server.uri())).expect("analytics url"),
    );
    let client = GatewayClient::new(auth).expect("client construction");

    client.send_analytics_event("card.failed", "custom").await;
}

#[tokio::test]
async fn analytics_disabled_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.send_analytics_event("card.nonce-received", "custom").await;
}
