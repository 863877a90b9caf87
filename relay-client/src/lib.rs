//! # Relay Client SDK
//!
//! A typed Rust client for the sign-in & payment relay.
//! Unwraps the `{status, message, data?, error?}` envelope on success and
//! turns error envelopes into [`ClientError::Api`].

use relay_types::{
    ApiResponse, GoogleSignInRequest, IdentityClaims, InitializePaymentRequest,
    PaymentInitialization, PaymentRecord,
};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Relay API client.
pub struct RelayClient {
    base_url: String,
    http: Client,
}

impl RelayClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Fetches the endpoint listing.
    pub async fn index(&self) -> Result<serde_json::Value, ClientError> {
        self.get(self.url(&[])?).await
    }

    /// Exchanges a Google ID token for the verified claims.
    pub async fn google_sign_in(&self, token: &str) -> Result<IdentityClaims, ClientError> {
        let req = GoogleSignInRequest {
            token: Some(token.to_string()),
        };
        self.post(self.url(&["auth", "google"])?, &req).await
    }

    /// Starts a payment.
    pub async fn initialize_payment(
        &self,
        req: &InitializePaymentRequest,
    ) -> Result<PaymentInitialization, ClientError> {
        self.post(self.url(&["payment", "initialize"])?, req).await
    }

    /// Looks up a payment by reference.
    pub async fn verify_payment(&self, reference: &str) -> Result<PaymentRecord, ClientError> {
        self.get(self.url(&["payment", "verify", reference])?).await
    }

    /// Builds `base_url/seg/...` with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        let body = resp.text().await?;

        if status.is_success() {
            let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
            if !envelope.is_success() {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message: envelope.message,
                    detail: envelope.error,
                });
            }
            return envelope.data.ok_or_else(|| ClientError::Api {
                status: status.as_u16(),
                message: envelope.message,
                detail: Some("Response carried no data".into()),
            });
        }

        match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
            Ok(envelope) => Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope.message,
                detail: envelope.error,
            }),
            Err(_) => Err(ClientError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
                detail: Some(body).filter(|b| !b.is_empty()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RelayClient::new("http://localhost:3000");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = RelayClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_reference_is_percent_encoded() {
        let client = RelayClient::new("http://localhost:3000/api");
        let url = client.url(&["payment", "verify", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/payment/verify/a%20b%2Fc");
    }

    #[test]
    fn test_invalid_base_url() {
        let client = RelayClient::new("not a url");
        assert!(matches!(client.url(&[]), Err(ClientError::InvalidUrl(_))));
    }
}
