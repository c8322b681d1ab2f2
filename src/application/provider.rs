use crate::domain::context::{CheckoutRequest, CheckoutSession, Event};
use crate::domain::gateway::{GatewayResponse, PayByLinkRequest};
use crate::domain::payment::{
    Amount, OrderId, OrderPayment, OrderStatus, PaymentState, format_price,
};
use crate::domain::ports::{PaymentGatewayBox, PaymentStoreBox, SettingsStore};
use crate::domain::settings::{Environment, ProviderSettings, SettingsSandbox};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

pub const IDENTIFIER: &str = "mbway_via_ifthenpay";
pub const VERBOSE_NAME: &str = "MBWAY via IfThenPay";
pub const SUPPORTED_CURRENCIES: &[&str] = &["EUR"];

const TEST_MODE_MESSAGE: &str = "The IfThenPay is being used in test mode";
const INVOICE_PAID_TEXT: &str = "The payment for this invoice has already been received.";

pub fn supports_currency(currency: &str) -> bool {
    SUPPORTED_CURRENCIES.contains(&currency)
}

/// Display-only summary of a payment for the host's control panel.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ControlSummary {
    pub id_order: Option<String>,
    pub amount: String,
    pub description: String,
    pub language: String,
    pub status: PaymentState,
}

impl fmt::Display for ControlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Order ID: {}", self.id_order.as_deref().unwrap_or("-"))?;
        writeln!(f, "Amount: {}", self.amount)?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Language: {}", self.language)?;
        write!(f, "Status: {}", self.status)
    }
}

/// MB WAY payments through the IfThenPay pay-by-link API.
///
/// One instance serves one event. The provider builds and sends the gateway
/// request, and moves a payment to `pending` once the gateway acknowledges
/// it. Confirmation arrives later through the host's webhook handling and is
/// never set here.
pub struct MbWayProvider {
    event: Event,
    settings: ProviderSettings,
    gateway: PaymentGatewayBox,
    payments: PaymentStoreBox,
}

impl MbWayProvider {
    pub fn new(
        event: Event,
        settings: ProviderSettings,
        gateway: PaymentGatewayBox,
        payments: PaymentStoreBox,
    ) -> Self {
        Self {
            event,
            settings,
            gateway,
            payments,
        }
    }

    /// Creates a provider with settings read from the event's settings sandbox.
    pub async fn from_settings_store(
        event: Event,
        settings_store: &dyn SettingsStore,
        gateway: PaymentGatewayBox,
        payments: PaymentStoreBox,
    ) -> Result<Self> {
        let sandbox = SettingsSandbox::new(settings_store, event.slug.clone());
        let settings = ProviderSettings::load(&sandbox).await?;
        Ok(Self::new(event, settings, gateway, payments))
    }

    pub fn identifier(&self) -> &'static str {
        IDENTIFIER
    }

    pub fn verbose_name(&self) -> &'static str {
        VERBOSE_NAME
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    pub fn test_mode_message(&self) -> Option<&'static str> {
        match self.settings.environment {
            Environment::Test => Some(TEST_MODE_MESSAGE),
            Environment::Live => None,
        }
    }

    /// Whether customers of this event may pick MB WAY at checkout.
    pub fn is_allowed(&self) -> bool {
        self.settings.enabled && supports_currency(&self.event.currency)
    }

    /// MB WAY collects nothing at checkout, so picking the provider is enough.
    pub fn payment_is_valid_session(&self, session: &CheckoutSession) -> bool {
        session.payment_provider.as_deref() == Some(IDENTIFIER)
    }

    pub fn refund_supported(&self, _payment: &OrderPayment) -> bool {
        false
    }

    pub fn partial_refund_supported(&self, _payment: &OrderPayment) -> bool {
        false
    }

    pub fn abort_pending_allowed(&self) -> bool {
        false
    }

    pub fn format_price(&self, value: Decimal) -> String {
        format_price(value)
    }

    pub fn checkout_prepare(&self, _request: &CheckoutRequest) -> Result<bool> {
        Ok(true)
    }

    pub fn payment_prepare(
        &self,
        _request: &CheckoutRequest,
        _payment: &OrderPayment,
    ) -> Result<bool> {
        Ok(true)
    }

    pub fn payment_form_render(&self) -> String {
        format!(
            "You will receive a payment request for this order in your MB WAY app. {}",
            self.test_mode_message().unwrap_or_default()
        )
        .trim_end()
        .to_string()
    }

    pub fn checkout_confirm_render(&self) -> String {
        "After you confirm the order, accept the payment request in your MB WAY app.".to_string()
    }

    pub fn payment_pending_render(&self, payment: &OrderPayment) -> String {
        format!(
            "We sent an MB WAY payment request of {} {} for order {}. \
             Your order will be confirmed as soon as you accept it in the app.",
            format_price(payment.amount),
            self.event.currency,
            self.matching_id(payment).unwrap_or_default()
        )
    }

    /// Identifier the gateway knows this payment by.
    pub fn matching_id(&self, payment: &OrderPayment) -> Option<String> {
        payment.order_id().map(|id| id.to_string())
    }

    /// Checks the settings and the payment and assembles the gateway call.
    ///
    /// Fails with `Configuration` listing every missing input.
    pub fn build_request(
        &self,
        request: &CheckoutRequest,
        payment: &OrderPayment,
    ) -> Result<PayByLinkRequest> {
        let gateway_key = self.settings.gateway_key.trim();
        let mb_way_key = self.settings.mb_way_key.trim();
        let order_id = payment.order_id();
        let amount = Amount::new(payment.amount).ok();

        let mut missing = Vec::new();
        if gateway_key.is_empty() {
            missing.push("gateway key");
        }
        if mb_way_key.is_empty() {
            missing.push("MB WAY key");
        }
        if order_id.is_none() {
            missing.push("order id");
        }
        if amount.is_none() {
            missing.push("amount");
        }

        match (order_id, amount) {
            (Some(order_id), Some(amount)) if missing.is_empty() => Ok(PayByLinkRequest {
                gateway_key: gateway_key.to_string(),
                mb_way_key: mb_way_key.to_string(),
                order_id,
                amount,
                description: self.settings.description.clone(),
                language: request.language().to_string(),
            }),
            _ => Err(PaymentError::Configuration(format!(
                "Missing {}",
                missing.join(", ")
            ))),
        }
    }

    /// Sends the payment request to the gateway.
    ///
    /// On an HTTP 200 the payment moves to `pending`, is saved once, and the
    /// raw response is returned. Any other outcome leaves the payment as it was.
    /// Only a payment still in `created` is sent.
    pub async fn execute_payment(
        &self,
        request: &CheckoutRequest,
        payment: &mut OrderPayment,
    ) -> Result<GatewayResponse> {
        if payment.state != PaymentState::Created {
            tracing::error!(
                event = %self.event.slug,
                local_id = ?payment.local_id,
                state = %payment.state,
                "Refusing to resend a payment that already left the created state"
            );
            return Err(PaymentError::Configuration(format!(
                "Payment is {} and cannot be sent to the gateway",
                payment.state
            )));
        }

        let pay_request = self.build_request(request, payment).inspect_err(|e| {
            tracing::error!(
                event = %self.event.slug,
                local_id = ?payment.local_id,
                "Refusing to contact gateway: {}",
                e
            );
        })?;

        let response = match self.gateway.pay_by_link(&pay_request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(order_id = %pay_request.order_id, "Gateway unreachable: {}", e);
                return Err(e);
            }
        };

        if !response.status.is_success() {
            tracing::warn!(
                order_id = %pay_request.order_id,
                status = response.status.code(),
                "Gateway rejected payment request"
            );
            return Err(PaymentError::GatewayRejected {
                status: response.status.code(),
                body: response.body,
            });
        }

        let mut pending = payment.clone();
        pending.state = PaymentState::Pending;
        self.payments.save(&pending).await.inspect_err(|e| {
            tracing::error!(order_id = %pay_request.order_id, "Failed to store pending payment: {}", e);
        })?;
        *payment = pending;
        tracing::info!(order_id = %pay_request.order_id, "Payment is pending MB WAY approval");

        Ok(response)
    }

    pub fn payment_control_render(
        &self,
        request: &CheckoutRequest,
        payment: &OrderPayment,
    ) -> ControlSummary {
        ControlSummary {
            id_order: self.matching_id(payment),
            amount: format_price(payment.amount),
            description: self.settings.description.clone(),
            language: request.language().to_string(),
            status: payment.state,
        }
    }

    pub fn payment_control_render_short(&self, payment: &OrderPayment) -> String {
        self.matching_id(payment).unwrap_or_default()
    }

    /// Payment details exposed through the host's REST API.
    pub fn api_payment_details(&self, payment: &OrderPayment) -> serde_json::Value {
        serde_json::json!({
            "order_id": payment.order_id().map(|id: OrderId| id.to_string()),
            "amount": format_price(payment.amount),
            "state": payment.state,
        })
    }

    /// Removes personal data from the stored payment info.
    pub async fn shred_payment_info(&self, payment: &mut OrderPayment) -> Result<()> {
        payment.info = serde_json::json!({ "_shredded": true });
        self.payments.save(payment).await
    }

    pub fn render_invoice_text(&self, order_status: OrderStatus, _payment: &OrderPayment) -> String {
        if order_status == OrderStatus::Paid {
            return INVOICE_PAID_TEXT.to_string();
        }
        self.settings.invoice_text.clone()
    }
}
