use crate::error::PaymentError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The gateway only accepts numeric order ids of up to 15 digits.
pub const ORDER_ID_MODULUS: u64 = 1_000_000_000_000_000;

/// Lifecycle of an order payment as the host tracks it.
///
/// This adapter only ever moves a payment from `Created` to `Pending`; the
/// other transitions belong to the host and its webhook handling.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    #[default]
    Created,
    Pending,
    Confirmed,
    Failed,
    Canceled,
    Refunded,
}

impl PaymentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentState::Created => "created",
            PaymentState::Pending => "pending",
            PaymentState::Confirmed => "confirmed",
            PaymentState::Failed => "failed",
            PaymentState::Canceled => "canceled",
            PaymentState::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Expired,
    Canceled,
}

/// Numeric order identifier sent to the gateway.
///
/// Derived from the host's local payment id by truncating it modulo 10^15.
/// Two local ids congruent modulo 10^15 map to the same order id.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
pub struct OrderId(u64);

impl OrderId {
    pub fn from_local_id(local_id: u64) -> Self {
        Self(local_id % ORDER_ID_MODULUS)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a positive monetary amount charged through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::Configuration(
                "Amount must be positive".to_string(),
            ))
        }
    }

    /// Formats the amount with exactly two fraction digits, e.g. `12.50`.
    pub fn formatted(&self) -> String {
        format_price(self.0)
    }
}

/// Two fraction digits, midpoints rounded away from zero.
pub fn format_price(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// The slice of the host's order payment record this provider reads and writes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OrderPayment {
    /// Host-assigned id; `None` until the host has saved the record.
    pub local_id: Option<u64>,
    pub amount: Decimal,
    pub state: PaymentState,
    /// Provider-specific audit data kept by the host.
    #[serde(default)]
    pub info: serde_json::Value,
}

impl OrderPayment {
    pub fn new(local_id: u64, amount: Decimal) -> Self {
        Self {
            local_id: Some(local_id),
            amount,
            state: PaymentState::Created,
            info: serde_json::Value::Null,
        }
    }

    pub fn order_id(&self) -> Option<OrderId> {
        self.local_id.map(OrderId::from_local_id)
    }
}
