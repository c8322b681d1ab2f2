use serde::{Deserialize, Serialize};

/// Request language used when the host does not provide one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// The event a payment belongs to, reduced to what the provider reads.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Event {
    pub slug: String,
    pub name: String,
    pub currency: String,
}

impl Event {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            currency: currency.into(),
        }
    }
}

/// Per-request data the host hands to the provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutRequest {
    /// Value of the request's `locale` header, if any.
    pub language: Option<String>,
}

impl CheckoutRequest {
    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
        }
    }

    /// The request language, falling back to English when unset or blank.
    pub fn language(&self) -> &str {
        match self.language.as_deref().map(str::trim) {
            Some(lang) if !lang.is_empty() => lang,
            _ => DEFAULT_LANGUAGE,
        }
    }
}

/// The checkout session state the host keeps between steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutSession {
    /// Identifier of the provider the customer picked, if any.
    pub payment_provider: Option<String>,
}
