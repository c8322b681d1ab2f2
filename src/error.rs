use thiserror::Error;

/// Generic text shown to the customer whenever a payment attempt fails.
pub const USER_FAILURE_MESSAGE: &str =
    "We were unable to process your payment. See below for details on how to proceed.";

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Gateway rejected the request with status {status}: {body}")]
    GatewayRejected { status: u16, body: String },
    #[error("Gateway unreachable: {cause}")]
    GatewayUnreachable { cause: String },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PaymentError {
    /// The message the host should display to the customer.
    ///
    /// Every kind collapses to the same generic text; the variant itself is
    /// what callers and logs use to tell them apart.
    pub fn user_message(&self) -> &'static str {
        USER_FAILURE_MESSAGE
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, PaymentError::Configuration(_))
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        PaymentError::GatewayUnreachable {
            cause: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
