#![allow(dead_code)]

use async_trait::async_trait;
use mbway_ifthenpay::application::provider::MbWayProvider;
use mbway_ifthenpay::domain::context::Event;
use mbway_ifthenpay::domain::gateway::{GatewayResponse, GatewayStatus, PayByLinkRequest};
use mbway_ifthenpay::domain::payment::OrderPayment;
use mbway_ifthenpay::domain::ports::{PaymentGateway, PaymentStore};
use mbway_ifthenpay::domain::settings::{Environment, ProviderSettings};
use mbway_ifthenpay::error::{PaymentError, Result};
use mbway_ifthenpay::infrastructure::in_memory::InMemoryPaymentStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub enum Outcome {
    Respond(GatewayStatus, String),
    Unreachable,
}

/// Gateway double that records every request it receives.
#[derive(Clone)]
pub struct RecordingGateway {
    outcome: Outcome,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<PayByLinkRequest>>>,
}

impl RecordingGateway {
    pub fn responding(status: impl Into<GatewayStatus>, body: &str) -> Self {
        Self::with_outcome(Outcome::Respond(status.into(), body.to_string()))
    }

    pub fn unreachable() -> Self {
        Self::with_outcome(Outcome::Unreachable)
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<PayByLinkRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn pay_by_link(&self, request: &PayByLinkRequest) -> Result<GatewayResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        match &self.outcome {
            Outcome::Respond(status, body) => Ok(GatewayResponse {
                status: *status,
                body: body.clone(),
            }),
            Outcome::Unreachable => Err(PaymentError::GatewayUnreachable {
                cause: "connection refused".to_string(),
            }),
        }
    }
}

/// Payment store whose backend is down.
#[derive(Clone, Default)]
pub struct FailingPaymentStore;

#[async_trait]
impl PaymentStore for FailingPaymentStore {
    async fn save(&self, _payment: &OrderPayment) -> Result<()> {
        Err(PaymentError::Storage("db down".to_string()))
    }

    async fn get(&self, _local_id: u64) -> Result<Option<OrderPayment>> {
        Err(PaymentError::Storage("db down".to_string()))
    }
}

pub fn settings() -> ProviderSettings {
    ProviderSettings {
        enabled: true,
        gateway_key: "GW-123".to_string(),
        mb_way_key: "MBW-456".to_string(),
        environment: Environment::Test,
        description: "Festival tickets".to_string(),
        invoice_text: String::new(),
    }
}

pub fn event() -> Event {
    Event::new("fest", "Summer Festival", "EUR")
}

pub fn provider(
    settings: ProviderSettings,
    gateway: RecordingGateway,
    payments: InMemoryPaymentStore,
) -> MbWayProvider {
    MbWayProvider::new(event(), settings, Box::new(gateway), Box::new(payments))
}
