use crate::domain::payment::OrderPayment;
use crate::domain::ports::{PaymentStore, SettingsStore};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory store for order payments.
///
/// Counts every `save` so callers can check how often a payment was persisted.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<u64, OrderPayment>>>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn save(&self, payment: &OrderPayment) -> Result<()> {
        let local_id = payment.local_id.ok_or_else(|| {
            PaymentError::Storage("Cannot save a payment without a local id".to_string())
        })?;
        let mut payments = self.payments.write().await;
        payments.insert(local_id, payment.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self, local_id: u64) -> Result<Option<OrderPayment>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&local_id).cloned())
    }
}

/// A thread-safe in-memory settings store, keyed by event then setting name.
#[derive(Default, Clone)]
pub struct InMemorySettingsStore {
    settings: Arc<RwLock<HashMap<String, HashMap<String, String>>>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, event: &str, key: &str) -> Result<Option<String>> {
        let settings = self.settings.read().await;
        Ok(settings.get(event).and_then(|s| s.get(key)).cloned())
    }

    async fn set(&self, event: &str, key: &str, value: String) -> Result<()> {
        let mut settings = self.settings.write().await;
        settings
            .entry(event.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }
}
