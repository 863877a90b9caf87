//! Integration tests for Google ID token verification against a mock JWKS endpoint.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use relay_adapters::{GoogleConfig, GoogleIdTokenVerifier};
use relay_types::{IdentityError, IdentityVerifier};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLIENT_ID: &str = "relay-test.apps.googleusercontent.com";
const KEY_ID: &str = "test-key-1";
const SIGNING_KEY: &[u8] = include_bytes!("fixtures/google_test_key.pem");
const ROGUE_KEY: &[u8] = include_bytes!("fixtures/rogue_test_key.pem");
const JWKS: &str = include_str!("fixtures/google_jwks.json");

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn claims() -> Value {
    json!({
        "iss": "https://accounts.google.com",
        "aud": CLIENT_ID,
        "sub": "110169484474386276334",
        "email": "ada@example.com",
        "email_verified": true,
        "name": "Ada Lovelace",
        "picture": "https://lh3.googleusercontent.com/a/photo.jpg",
        "iat": now(),
        "exp": now() + 3600
    })
}

fn sign(claims: &Value, kid: &str, pem: &[u8]) -> String {
    let header = Header {
        kid: Some(kid.to_string()),
        ..Header::new(Algorithm::RS256)
    };
    encode(&header, claims, &EncodingKey::from_rsa_pem(pem).unwrap()).unwrap()
}

async fn mock_certs(server: &MockServer, expected_calls: u64) {
    let jwks: Value = serde_json::from_str(JWKS).unwrap();
    Mock::given(method("GET"))
        .and(path("/oauth2/v3/certs"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("cache-control", "public, max-age=3600")
                .set_body_json(jwks),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn verifier(server: &MockServer) -> GoogleIdTokenVerifier {
    let config = GoogleConfig {
        certs_url: format!("{}/oauth2/v3/certs", server.uri()),
        ..GoogleConfig::new(CLIENT_ID)
    };
    GoogleIdTokenVerifier::new(&config).unwrap()
}

#[tokio::test]
async fn test_valid_token_yields_claims() {
    let server = MockServer::start().await;
    mock_certs(&server, 1).await;

    let token = sign(&claims(), KEY_ID, SIGNING_KEY);
    let identity = verifier(&server).verify(&token).await.unwrap();

    assert_eq!(identity.user_id, "110169484474386276334");
    assert_eq!(identity.email.as_deref(), Some("ada@example.com"));
    assert_eq!(identity.name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(identity.email_verified, Some(true));
}

#[tokio::test]
async fn test_signing_keys_are_cached() {
    let server = MockServer::start().await;
    mock_certs(&server, 1).await;

    let verifier = verifier(&server);
    let token = sign(&claims(), KEY_ID, SIGNING_KEY);

    verifier.verify(&token).await.unwrap();
    verifier.verify(&token).await.unwrap();
}

#[tokio::test]
async fn test_wrong_audience_is_rejected() {
    let server = MockServer::start().await;
    mock_certs(&server, 1).await;

    let mut claims = claims();
    claims["aud"] = json!("someone-else.apps.googleusercontent.com");
    let token = sign(&claims, KEY_ID, SIGNING_KEY);

    let err = verifier(&server).verify(&token).await.unwrap_err();
    assert!(matches!(err, IdentityError::InvalidToken(ref msg) if msg.contains("InvalidAudience")));
}

#[tokio::test]
async fn test_foreign_issuer_is_rejected() {
    let server = MockServer::start().await;
    mock_certs(&server, 1).await;

    let mut claims = claims();
    claims["iss"] = json!("https://evil.example.com");
    let token = sign(&claims, KEY_ID, SIGNING_KEY);

    let err = verifier(&server).verify(&token).await.unwrap_err();
    assert!(matches!(err, IdentityError::InvalidToken(ref msg) if msg.contains("InvalidIssuer")));
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let server = MockServer::start().await;
    mock_certs(&server, 1).await;

    let mut claims = claims();
    claims["iat"] = json!(now() - 7200);
    claims["exp"] = json!(now() - 3600);
    let token = sign(&claims, KEY_ID, SIGNING_KEY);

    let err = verifier(&server).verify(&token).await.unwrap_err();
    assert!(matches!(err, IdentityError::InvalidToken(ref msg) if msg.contains("ExpiredSignature")));
}

#[tokio::test]
async fn test_token_signed_with_other_key_is_rejected() {
    let server = MockServer::start().await;
    mock_certs(&server, 1).await;

    let token = sign(&claims(), KEY_ID, ROGUE_KEY);

    let err = verifier(&server).verify(&token).await.unwrap_err();
    assert!(matches!(err, IdentityError::InvalidToken(ref msg) if msg.contains("InvalidSignature")));
}

#[tokio::test]
async fn test_unknown_key_id_is_rejected() {
    let server = MockServer::start().await;
    mock_certs(&server, 1).await;

    let token = sign(&claims(), "rotated-away", SIGNING_KEY);

    let err = verifier(&server).verify(&token).await.unwrap_err();
    assert!(matches!(err, IdentityError::InvalidToken(ref msg) if msg.contains("rotated-away")));
}

#[tokio::test]
async fn test_unknown_key_ids_share_one_fetch() {
    let server = MockServer::start().await;
    mock_certs(&server, 1).await;

    let verifier = verifier(&server);
    for i in 0..20 {
        let kid = format!("made-up-{}", i);
        let token = sign(&claims(), &kid, SIGNING_KEY);
        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidToken(ref msg) if msg.contains(&kid)));
    }

    // The cached set still serves the real key.
    let token = sign(&claims(), KEY_ID, SIGNING_KEY);
    verifier.verify(&token).await.unwrap();
}

#[tokio::test]
async fn test_garbage_token_never_fetches_keys() {
    let server = MockServer::start().await;
    mock_certs(&server, 0).await;

    let err = verifier(&server).verify("abc.def.ghi").await.unwrap_err();
    assert!(matches!(err, IdentityError::InvalidToken(_)));
}

#[tokio::test]
async fn test_unavailable_certs_endpoint_is_invalid_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/v3/certs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let token = sign(&claims(), KEY_ID, SIGNING_KEY);
    let err = verifier(&server).verify(&token).await.unwrap_err();
    assert!(matches!(err, IdentityError::InvalidToken(ref msg) if msg.contains("certificates")));
}
