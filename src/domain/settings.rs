use super::ports::SettingsStore;
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Prefix of every key this provider owns in the host's settings store.
pub const SETTINGS_PREFIX: &str = "payment_ifthenpay_";

pub const KEY_ENABLED: &str = "_enabled";
pub const KEY_GATEWAY_KEY: &str = "gateway_key";
pub const KEY_MB_WAY_KEY: &str = "mb_way_key";
pub const KEY_ENVIRONMENT: &str = "environment";
pub const KEY_INVOICE_TEXT: &str = "_invoice_text";
pub const KEY_DESCRIPTION: &str = "description";

const DOCS_URL: &str = "https://ifthenpay.com/";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Live,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Live => "live",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "live" => Ok(Environment::Live),
            "test" => Ok(Environment::Test),
            other => Err(PaymentError::Configuration(format!(
                "Unknown environment '{}', expected 'live' or 'test'",
                other
            ))),
        }
    }
}

/// Provider configuration for one event.
///
/// Loaded by the host and handed to the provider explicitly; nothing here is
/// looked up from global state.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct ProviderSettings {
    pub enabled: bool,
    pub gateway_key: String,
    pub mb_way_key: String,
    pub environment: Environment,
    pub description: String,
    pub invoice_text: String,
}

impl ProviderSettings {
    /// Reads the settings from the sandbox, applying field defaults for
    /// anything never saved.
    pub async fn load(sandbox: &SettingsSandbox<'_>) -> Result<Self> {
        let environment = match sandbox.get(KEY_ENVIRONMENT).await? {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };

        Ok(Self {
            enabled: sandbox
                .get(KEY_ENABLED)
                .await?
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
            gateway_key: sandbox.get(KEY_GATEWAY_KEY).await?.unwrap_or_default(),
            mb_way_key: sandbox.get(KEY_MB_WAY_KEY).await?.unwrap_or_default(),
            environment,
            description: sandbox.get(KEY_DESCRIPTION).await?.unwrap_or_default(),
            invoice_text: sandbox.get(KEY_INVOICE_TEXT).await?.unwrap_or_default(),
        })
    }

    pub async fn save(&self, sandbox: &SettingsSandbox<'_>) -> Result<()> {
        for (key, value) in self.to_form_values() {
            sandbox.set(key, value).await?;
        }
        Ok(())
    }

    /// The settings as the raw values the settings form would submit.
    pub fn to_form_values(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (KEY_ENABLED.to_string(), self.enabled.to_string()),
            (KEY_GATEWAY_KEY.to_string(), self.gateway_key.clone()),
            (KEY_MB_WAY_KEY.to_string(), self.mb_way_key.clone()),
            (KEY_ENVIRONMENT.to_string(), self.environment.to_string()),
            (KEY_DESCRIPTION.to_string(), self.description.clone()),
            (KEY_INVOICE_TEXT.to_string(), self.invoice_text.clone()),
        ])
    }

    /// Validates submitted form values against the settings schema.
    pub fn from_form_values(values: &BTreeMap<String, String>) -> Result<Self> {
        let value = |key: &str| values.get(key).map(|v| v.trim().to_string()).unwrap_or_default();

        for field in settings_form_fields() {
            if field.required && value(field.key).is_empty() {
                return Err(PaymentError::Configuration(format!(
                    "{} is required",
                    field.label
                )));
            }
        }

        let environment = match values.get(KEY_ENVIRONMENT) {
            Some(v) if !v.trim().is_empty() => v.parse()?,
            _ => Environment::default(),
        };

        Ok(Self {
            enabled: values.get(KEY_ENABLED).map(|v| parse_bool(v)).unwrap_or(false),
            gateway_key: value(KEY_GATEWAY_KEY),
            mb_way_key: value(KEY_MB_WAY_KEY),
            environment,
            description: value(KEY_DESCRIPTION),
            invoice_text: value(KEY_INVOICE_TEXT),
        })
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

/// Provider-scoped view of the host's per-event settings store.
pub struct SettingsSandbox<'a> {
    store: &'a dyn SettingsStore,
    event: String,
}

impl<'a> SettingsSandbox<'a> {
    pub fn new(store: &'a dyn SettingsStore, event: impl Into<String>) -> Self {
        Self {
            store,
            event: event.into(),
        }
    }

    fn full_key(key: &str) -> String {
        format!("{}{}", SETTINGS_PREFIX, key)
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        self.store.get(&self.event, &Self::full_key(key)).await
    }

    pub async fn set(&self, key: impl AsRef<str>, value: String) -> Result<()> {
        self.store
            .set(&self.event, &Self::full_key(key.as_ref()), value)
            .await
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Boolean,
    Choice {
        choices: Vec<(&'static str, &'static str)>,
        initial: &'static str,
    },
}

/// One entry of a settings form the host renders for administrators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsField {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub help_text: Option<String>,
    pub kind: FieldKind,
}

fn docs_help_text() -> Option<String> {
    Some(format!(
        "<a target=\"_blank\" rel=\"noopener\" href=\"{}\">Click here for more information</a>",
        DOCS_URL
    ))
}

fn environment_choice() -> FieldKind {
    FieldKind::Choice {
        choices: vec![("live", "Live"), ("test", "Test")],
        initial: "live",
    }
}

/// The provider's settings form, in display order.
///
/// The enable toggle always comes first and the reference description last.
pub fn settings_form_fields() -> Vec<SettingsField> {
    vec![
        SettingsField {
            key: KEY_ENABLED,
            label: "Enable payment method",
            required: false,
            help_text: None,
            kind: FieldKind::Boolean,
        },
        SettingsField {
            key: KEY_GATEWAY_KEY,
            label: "Gateway Key",
            required: true,
            help_text: docs_help_text(),
            kind: FieldKind::Text,
        },
        SettingsField {
            key: KEY_MB_WAY_KEY,
            label: "MB WAY Key",
            required: true,
            help_text: docs_help_text(),
            kind: FieldKind::Text,
        },
        SettingsField {
            key: KEY_ENVIRONMENT,
            label: "Environment",
            required: false,
            help_text: None,
            kind: environment_choice(),
        },
        SettingsField {
            key: KEY_INVOICE_TEXT,
            label: "Text on invoices",
            required: false,
            help_text: Some("Will be printed just below the payment figures.".to_string()),
            kind: FieldKind::Text,
        },
        SettingsField {
            key: KEY_DESCRIPTION,
            label: "Reference description",
            required: false,
            help_text: Some("Any value entered here will be added to the call".to_string()),
            kind: FieldKind::Text,
        },
    ]
}

/// Installation-wide settings the plugin registers with the host.
pub fn global_settings_fields() -> Vec<SettingsField> {
    vec![
        SettingsField {
            key: "payment_mbway_via_ifthenpay_mbway_key",
            label: "IfThenPay: MB WAY Key",
            required: false,
            help_text: None,
            kind: FieldKind::Text,
        },
        SettingsField {
            key: "payment_mbway_via_ifthenpay_environment",
            label: "IfThenPay: Environment",
            required: false,
            help_text: None,
            kind: environment_choice(),
        },
    ]
}
