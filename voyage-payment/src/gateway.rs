use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use voyage_core::payment::{GatewayError, GatewayResponse, InitializeTransaction, PaymentGateway};

#[derive(Debug, thiserror::Error)]
pub enum ChapaSetupError {
    #[error("invalid Chapa base url {0}: {1}")]
    InvalidBaseUrl(String, url::ParseError),
    #[error("Chapa base url {0} cannot carry a path")]
    OpaqueBaseUrl(String),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Chapa REST client: `POST /transaction/initialize`, `GET /transaction/verify/{tx_ref}`.
#[derive(Clone)]
pub struct ChapaClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ChapaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ChapaSetupError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ChapaSetupError::InvalidBaseUrl(base_url.to_string(), e))?;
        if base_url.cannot_be_a_base() {
            return Err(ChapaSetupError::OpaqueBaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn read(response: reqwest::Response) -> Result<GatewayResponse, GatewayError> {
        let status = response.status().as_u16();
        let body: serde_json::Value = response.json().await.map_err(|e| {
            warn!("Chapa returned a non-JSON body (HTTP {}): {}", status, e);
            GatewayError::Unreachable(format!("unreadable gateway response: {}", e))
        })?;
        Ok(GatewayResponse::new(status, body))
    }
}

#[async_trait]
impl PaymentGateway for ChapaClient {
    async fn initialize(
        &self,
        payload: &InitializeTransaction,
        secret_key: &str,
    ) -> Result<GatewayResponse, GatewayError> {
        let url = self.endpoint(&["transaction", "initialize"]);
        debug!("POST {} tx_ref={}", url, payload.tx_ref);

        let response = self
            .http
            .post(url)
            .bearer_auth(secret_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        Self::read(response).await
    }

    async fn verify(
        &self,
        tx_ref: &str,
        secret_key: &str,
    ) -> Result<GatewayResponse, GatewayError> {
        let url = self.endpoint(&["transaction", "verify", tx_ref]);
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .bearer_auth(secret_key)
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        Self::read(response).await
    }
}
