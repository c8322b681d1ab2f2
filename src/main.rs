use clap::{Parser, Subcommand};
use mbway_ifthenpay::application::provider::{MbWayProvider, supports_currency};
use mbway_ifthenpay::domain::context::{CheckoutRequest, Event};
use mbway_ifthenpay::domain::payment::OrderPayment;
use mbway_ifthenpay::domain::ports::{PaymentStore, SettingsStoreBox};
use mbway_ifthenpay::domain::settings::{
    self, KEY_DESCRIPTION, KEY_ENABLED, KEY_ENVIRONMENT, KEY_GATEWAY_KEY, KEY_INVOICE_TEXT,
    KEY_MB_WAY_KEY, ProviderSettings, SettingsSandbox,
};
use mbway_ifthenpay::infrastructure::ifthenpay::{DEFAULT_BASE_URL, IfThenPayClient};
use mbway_ifthenpay::infrastructure::in_memory::{InMemoryPaymentStore, InMemorySettingsStore};
use mbway_ifthenpay::infrastructure::json_file::JsonFileSettingsStore;
use miette::{IntoDiagnostic, Result, miette};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file holding provider settings. Without it, settings only live for this run.
    #[arg(long, env = "IFTHENPAY_SETTINGS_FILE", global = true)]
    settings_file: Option<PathBuf>,

    /// Slug of the event the settings belong to
    #[arg(long, default_value = "default", global = true)]
    event: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the settings form schema as JSON
    Fields {
        /// Print the installation-wide fields instead
        #[arg(long)]
        global: bool,
    },
    /// Validate and store provider settings for the event
    Configure {
        #[arg(long, env = "IFTHENPAY_GATEWAY_KEY", default_value = "")]
        gateway_key: String,
        #[arg(long, env = "IFTHENPAY_MBWAY_KEY", default_value = "")]
        mb_way_key: String,
        #[arg(long, env = "IFTHENPAY_ENVIRONMENT", default_value = "live")]
        environment: String,
        #[arg(long, env = "IFTHENPAY_DESCRIPTION", default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        invoice_text: String,
        /// Offer the payment method at checkout
        #[arg(long)]
        enabled: bool,
    },
    /// Print the stored settings as JSON
    ShowSettings,
    /// Send a pay-by-link request for one payment
    Pay {
        /// Host-assigned payment id
        #[arg(long)]
        local_id: u64,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        language: Option<String>,
        #[arg(long, default_value = "EUR")]
        currency: String,
        /// Overrides the stored gateway key
        #[arg(long, env = "IFTHENPAY_GATEWAY_KEY")]
        gateway_key: Option<String>,
        /// Overrides the stored MB WAY key
        #[arg(long, env = "IFTHENPAY_MBWAY_KEY")]
        mb_way_key: Option<String>,
        #[arg(long, env = "IFTHENPAY_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,
        #[arg(long, env = "IFTHENPAY_TIMEOUT_SECS", default_value_t = 30)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings_store: SettingsStoreBox = match &cli.settings_file {
        Some(path) => Box::new(JsonFileSettingsStore::open(path)),
        None => Box::new(InMemorySettingsStore::new()),
    };

    match cli.command {
        Command::Fields { global } => {
            let fields = if global {
                settings::global_settings_fields()
            } else {
                settings::settings_form_fields()
            };
            println!("{}", serde_json::to_string_pretty(&fields).into_diagnostic()?);
        }
        Command::Configure {
            gateway_key,
            mb_way_key,
            environment,
            description,
            invoice_text,
            enabled,
        } => {
            if cli.settings_file.is_none() {
                return Err(miette!("configure needs --settings-file to store the settings"));
            }

            let values = BTreeMap::from([
                (KEY_ENABLED.to_string(), enabled.to_string()),
                (KEY_GATEWAY_KEY.to_string(), gateway_key),
                (KEY_MB_WAY_KEY.to_string(), mb_way_key),
                (KEY_ENVIRONMENT.to_string(), environment),
                (KEY_DESCRIPTION.to_string(), description),
                (KEY_INVOICE_TEXT.to_string(), invoice_text),
            ]);
            let provider_settings = ProviderSettings::from_form_values(&values).into_diagnostic()?;

            let sandbox = SettingsSandbox::new(settings_store.as_ref(), cli.event.as_str());
            provider_settings.save(&sandbox).await.into_diagnostic()?;
            tracing::info!(event = %cli.event, "Stored IfThenPay settings");
        }
        Command::ShowSettings => {
            let sandbox = SettingsSandbox::new(settings_store.as_ref(), cli.event.as_str());
            let provider_settings = ProviderSettings::load(&sandbox).await.into_diagnostic()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&provider_settings).into_diagnostic()?
            );
        }
        Command::Pay {
            local_id,
            amount,
            language,
            currency,
            gateway_key,
            mb_way_key,
            base_url,
            timeout_secs,
        } => {
            if !supports_currency(&currency) {
                return Err(miette!("MB WAY payments are only available in EUR, not {}", currency));
            }

            let sandbox = SettingsSandbox::new(settings_store.as_ref(), cli.event.as_str());
            let mut provider_settings = ProviderSettings::load(&sandbox).await.into_diagnostic()?;
            if let Some(key) = gateway_key {
                provider_settings.gateway_key = key;
            }
            if let Some(key) = mb_way_key {
                provider_settings.mb_way_key = key;
            }
            if !provider_settings.enabled {
                tracing::warn!(event = %cli.event, "Provider is not enabled for this event");
            }

            let client = IfThenPayClient::with_options(base_url, Duration::from_secs(timeout_secs))
                .into_diagnostic()?;
            let payments = InMemoryPaymentStore::new();
            let provider = MbWayProvider::new(
                Event::new(cli.event.as_str(), cli.event.as_str(), currency),
                provider_settings,
                Box::new(client),
                Box::new(payments.clone()),
            );

            let request = CheckoutRequest { language };
            let mut payment = OrderPayment::new(local_id, amount);
            if let Err(e) = provider.execute_payment(&request, &mut payment).await {
                eprintln!("{}", e.user_message());
                return Err(e).into_diagnostic();
            }

            let stored = payments
                .get(local_id)
                .await
                .into_diagnostic()?
                .ok_or_else(|| miette!("Payment {} was not stored", local_id))?;
            let summary = provider.payment_control_render(&request, &stored);
            println!("{}", serde_json::to_string_pretty(&summary).into_diagnostic()?);
        }
    }

    Ok(())
}
