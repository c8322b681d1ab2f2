use crate::domain::gateway::{GatewayResponse, PayByLinkRequest};
use crate::domain::ports::PaymentGateway;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://ifthenpay.com";
pub const PAY_BY_LINK_PATH: &str = "/api/gateway/paybylink/get";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// IfThenPay "pay by link" client.
///
/// Every request carries a timeout, so an unresponsive gateway surfaces as
/// `GatewayUnreachable` instead of holding the caller indefinitely.
#[derive(Clone)]
pub struct IfThenPayClient {
    client: Client,
    base_url: String,
}

impl IfThenPayClient {
    /// Builds a client against `base_url`, e.g. `DEFAULT_BASE_URL` or a local
    /// mock server.
    pub fn with_options(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            PaymentError::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, PAY_BY_LINK_PATH)
    }
}

#[async_trait]
impl PaymentGateway for IfThenPayClient {
    async fn pay_by_link(&self, request: &PayByLinkRequest) -> Result<GatewayResponse> {
        tracing::debug!(
            order_id = %request.order_id,
            amount = %request.amount.formatted(),
            "Sending pay-by-link request"
        );

        let response = self
            .client
            .get(self.endpoint())
            .query(&request.query_pairs())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(GatewayResponse::new(status, body))
    }
}
