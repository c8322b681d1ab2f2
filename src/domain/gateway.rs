use super::payment::{Amount, OrderId};
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag the gateway expects in front of the MB WAY key in `accounts`.
pub const MBWAY_ACCOUNT_TAG: &str = "MBWAY";

/// HTTP status as reported back by a gateway transport.
///
/// Some transports hand the status over as text. Both forms compare by
/// numeric value, so `"200"` and `200` are the same status.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct GatewayStatus(u16);

impl GatewayStatus {
    pub const OK: Self = Self(200);

    pub fn code(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        *self == Self::OK
    }
}

impl From<u16> for GatewayStatus {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl FromStr for GatewayStatus {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u16>()
            .map(Self)
            .map_err(|_| PaymentError::GatewayRejected {
                status: 0,
                body: format!("Invalid HTTP status '{}'", s),
            })
    }
}

impl fmt::Display for GatewayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the gateway answered, kept only long enough to pick the next state.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct GatewayResponse {
    pub status: GatewayStatus,
    pub body: String,
}

impl GatewayResponse {
    pub fn new(status: impl Into<GatewayStatus>, body: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            body: body.into(),
        }
    }
}

/// A validated "pay by link" call, built fresh for each attempt.
#[derive(Debug, PartialEq, Clone)]
pub struct PayByLinkRequest {
    pub gateway_key: String,
    pub mb_way_key: String,
    pub order_id: OrderId,
    pub amount: Amount,
    pub description: String,
    pub language: String,
}

impl PayByLinkRequest {
    /// `accounts` parameter value: `MBWAY|<mb way key>`.
    pub fn accounts(&self) -> String {
        format!("{}|{}", MBWAY_ACCOUNT_TAG, self.mb_way_key)
    }

    /// Query parameters in the order the gateway documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("gatewaykey", self.gateway_key.clone()),
            ("id", self.order_id.to_string()),
            ("amount", self.amount.formatted()),
            ("description", self.description.clone()),
            ("lang", self.language.clone()),
            ("accounts", self.accounts()),
        ]
    }
}
