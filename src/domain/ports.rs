use super::gateway::{GatewayResponse, PayByLinkRequest};
use super::payment::OrderPayment;
use crate::error::Result;
use async_trait::async_trait;

/// Outbound connection to the payment gateway.
///
/// Implementations return `Ok` for any HTTP answer, whatever its status, and
/// reserve `Err` for requests that never got one.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn pay_by_link(&self, request: &PayByLinkRequest) -> Result<GatewayResponse>;
}

/// The host's order payment persistence.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn save(&self, payment: &OrderPayment) -> Result<()>;
    async fn get(&self, local_id: u64) -> Result<Option<OrderPayment>>;
}

/// The host's per-event key/value settings storage.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, event: &str, key: &str) -> Result<Option<String>>;
    async fn set(&self, event: &str, key: &str, value: String) -> Result<()>;
}

pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type SettingsStoreBox = Box<dyn SettingsStore>;
