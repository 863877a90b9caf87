//! Client behaviour against a mocked relay.

use relay_client::{ClientError, RelayClient};
use relay_types::InitializePaymentRequest;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_success_envelope_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/payment/verify/T123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Payment verification successful",
            "data": {
                "reference": "T123",
                "amount": 19.99,
                "currency": "NGN",
                "status": "success",
                "paidAt": null,
                "channel": "card",
                "customer": { "email": "ada@example.com" },
                "metadata": {}
            }
        })))
        .mount(&server)
        .await;

    let record = RelayClient::new(server.uri())
        .verify_payment("T123")
        .await
        .unwrap();

    assert_eq!(record.reference, "T123");
    assert_eq!(record.amount.to_string(), "19.99");
    assert_eq!(record.customer.email, "ada@example.com");
}

#[tokio::test]
async fn test_error_envelope_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/google"))
        .and(body_json(json!({ "token": "forged" })))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "message": "Invalid Google token",
            "error": "InvalidSignature"
        })))
        .mount(&server)
        .await;

    let err = RelayClient::new(server.uri())
        .google_sign_in("forged")
        .await
        .unwrap_err();

    match err {
        ClientError::Api {
            status,
            message,
            detail,
        } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid Google token");
            assert_eq!(detail.as_deref(), Some("InvalidSignature"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_initialize_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payment/initialize"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "amount": 10.5,
            "reference": "order-7"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Payment initialized successfully",
            "data": {
                "authorization_url": "https://checkout.paystack.com/x",
                "access_code": "x",
                "reference": "order-7"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let req = InitializePaymentRequest {
        email: Some("ada@example.com".into()),
        amount: Some(json!(10.5)),
        reference: Some("order-7".into()),
        ..Default::default()
    };
    let init = RelayClient::new(server.uri())
        .initialize_payment(&req)
        .await
        .unwrap();

    assert_eq!(init.reference, "order-7");
}

#[tokio::test]
async fn test_non_envelope_error_uses_status_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = RelayClient::new(server.uri()).index().await.unwrap_err();

    match err {
        ClientError::Api {
            status, message, ..
        } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_error_envelope_with_ok_status_is_still_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/payment/verify/T9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "Failed to verify payment",
            "error": "Transaction reference not found"
        })))
        .mount(&server)
        .await;

    let err = RelayClient::new(server.uri())
        .verify_payment("T9")
        .await
        .unwrap_err();

    match err {
        ClientError::Api {
            status,
            message,
            detail,
        } => {
            assert_eq!(status, 200);
            assert_eq!(message, "Failed to verify payment");
            assert_eq!(detail.as_deref(), Some("Transaction reference not found"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
