//! HTTP-level tests for the probe and the refresh exchange, against a mock
//! authorization server / resource endpoint.

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tokenwarden::credential::CredentialRecord;
use tokenwarden::error::WardenError;
use tokenwarden::oauth::{
    http_client, HttpRefresher, HttpVerifier, ProbeOutcome, TokenRefresher, TokenVerifier,
};

fn credential() -> CredentialRecord {
    CredentialRecord {
        account_id: "acct_1".into(),
        client_id: "cid".into(),
        client_secret: "shh".into(),
        access_token: "AT1".into(),
        refresh_token: "RT1".into(),
        refreshed_at: None,
    }
}

async fn verifier_for(server: &MockServer) -> HttpVerifier {
    HttpVerifier::new(http_client(2).unwrap(), format!("{}/fields", server.uri()))
}

async fn refresher_for(server: &MockServer) -> HttpRefresher {
    HttpRefresher::new(http_client(2).unwrap(), format!("{}/auth/token", server.uri()))
}

#[tokio::test]
async fn probe_maps_200_to_valid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fields"))
        .and(header("Authorization", "Bearer AT1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let outcome = verifier_for(&server).await.verify("AT1").await;
    assert_eq!(outcome, ProbeOutcome::Valid);
}

#[tokio::test]
async fn probe_maps_401_to_expired() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fields"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let outcome = verifier_for(&server).await.verify("AT1").await;
    assert_eq!(outcome, ProbeOutcome::Expired);
}

#[tokio::test]
async fn probe_maps_server_errors_to_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fields"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    match verifier_for(&server).await.verify("AT1").await {
        ProbeOutcome::Unknown { reason } => assert!(reason.contains("500")),
        other => panic!("expected Unknown, got {other:?}"),
    }
}

#[tokio::test]
async fn probe_maps_transport_failure_to_unknown() {
    // Nothing is listening on the server's port once it is dropped.
    let server = MockServer::start().await;
    let verifier = verifier_for(&server).await;
    drop(server);

    match verifier.verify("AT1").await {
        ProbeOutcome::Unknown { .. } => {}
        other => panic!("expected Unknown, got {other:?}"),
    }
}

#[tokio::test]
async fn refresh_sends_the_grant_and_parses_the_token_pair() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=RT1"))
        .and(body_string_contains("client_id=cid"))
        .and(body_string_contains("client_secret=shh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "AT2",
            "refresh_token": "RT2",
            "token_type": "Bearer",
            "expires_in": 86400
        })))
        .mount(&server)
        .await;

    let tokens = refresher_for(&server)
        .await
        .refresh(&credential())
        .await
        .unwrap();
    assert_eq!(tokens.access_token, "AT2");
    assert_eq!(tokens.refresh_token.as_deref(), Some("RT2"));
}

#[tokio::test]
async fn refresh_surfaces_a_missing_refresh_token_as_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "AT2"
        })))
        .mount(&server)
        .await;

    let tokens = refresher_for(&server)
        .await
        .refresh(&credential())
        .await
        .unwrap();
    assert_eq!(tokens.access_token, "AT2");
    assert_eq!(tokens.refresh_token, None);
}

#[tokio::test]
async fn refresh_fails_on_a_rejected_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"error": "invalid_grant"})),
        )
        .mount(&server)
        .await;

    let err = refresher_for(&server)
        .await
        .refresh(&credential())
        .await
        .unwrap_err();
    match err {
        WardenError::RefreshFailed(reason) => {
            assert!(reason.contains("400"));
            assert!(reason.contains("invalid_grant"));
        }
        other => panic!("expected RefreshFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn refresh_fails_on_a_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = refresher_for(&server)
        .await
        .refresh(&credential())
        .await
        .unwrap_err();
    assert!(matches!(err, WardenError::RefreshFailed(_)));
}
