mod common;

use common::{FailingPaymentStore, RecordingGateway, event, provider, settings};
use mbway_ifthenpay::application::provider::MbWayProvider;
use mbway_ifthenpay::domain::context::CheckoutRequest;
use mbway_ifthenpay::domain::gateway::GatewayStatus;
use mbway_ifthenpay::domain::payment::{OrderPayment, PaymentState};
use mbway_ifthenpay::domain::ports::PaymentStore;
use mbway_ifthenpay::error::PaymentError;
use mbway_ifthenpay::infrastructure::in_memory::InMemoryPaymentStore;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_success_moves_payment_to_pending_and_saves_once() {
    let gateway = RecordingGateway::responding(200u16, "https://ifthenpay.com/pay/abc");
    let payments = InMemoryPaymentStore::new();
    let provider = provider(settings(), gateway.clone(), payments.clone());

    let mut payment = OrderPayment::new(42, dec!(25.5));
    let response = provider
        .execute_payment(&CheckoutRequest::with_language("pt"), &mut payment)
        .await
        .unwrap();

    assert_eq!(response.body, "https://ifthenpay.com/pay/abc");
    assert_eq!(payment.state, PaymentState::Pending);
    assert_eq!(payments.save_count(), 1);
    assert_eq!(
        payments.get(42).await.unwrap().unwrap().state,
        PaymentState::Pending
    );
    assert_eq!(gateway.calls(), 1);

    let sent = gateway.last_request().unwrap();
    assert_eq!(sent.gateway_key, "GW-123");
    assert_eq!(sent.accounts(), "MBWAY|MBW-456");
    assert_eq!(sent.amount.formatted(), "25.50");
    assert_eq!(sent.order_id.to_string(), "42");
    assert_eq!(sent.description, "Festival tickets");
    assert_eq!(sent.language, "pt");
}

#[tokio::test]
async fn test_textual_status_200_counts_as_success() {
    let status: GatewayStatus = "200".parse().unwrap();
    let gateway = RecordingGateway::responding(status, "ok");
    let payments = InMemoryPaymentStore::new();
    let provider = provider(settings(), gateway, payments.clone());

    let mut payment = OrderPayment::new(7, dec!(10));
    provider
        .execute_payment(&CheckoutRequest::default(), &mut payment)
        .await
        .unwrap();

    assert_eq!(payment.state, PaymentState::Pending);
    assert_eq!(payments.save_count(), 1);
}

#[tokio::test]
async fn test_non_success_status_leaves_payment_created() {
    for code in [201u16, 400, 404, 500, 503] {
        let gateway = RecordingGateway::responding(code, "error body");
        let payments = InMemoryPaymentStore::new();
        let provider = provider(settings(), gateway.clone(), payments.clone());

        let mut payment = OrderPayment::new(9, dec!(12));
        let err = provider
            .execute_payment(&CheckoutRequest::default(), &mut payment)
            .await
            .unwrap_err();

        match err {
            PaymentError::GatewayRejected { status, body } => {
                assert_eq!(status, code);
                assert_eq!(body, "error body");
            }
            other => panic!("unexpected error for {code}: {other:?}"),
        }
        assert_eq!(payment.state, PaymentState::Created);
        assert_eq!(payments.save_count(), 0);
        assert_eq!(gateway.calls(), 1);
    }
}

#[tokio::test]
async fn test_unreachable_gateway_is_reported_distinctly() {
    let gateway = RecordingGateway::unreachable();
    let payments = InMemoryPaymentStore::new();
    let provider = provider(settings(), gateway, payments.clone());

    let mut payment = OrderPayment::new(3, dec!(5));
    let err = provider
        .execute_payment(&CheckoutRequest::default(), &mut payment)
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::GatewayUnreachable { .. }));
    assert_eq!(payment.state, PaymentState::Created);
    assert_eq!(payments.save_count(), 0);
}

#[tokio::test]
async fn test_missing_inputs_fail_before_any_gateway_call() {
    let mut no_gateway_key = settings();
    no_gateway_key.gateway_key = String::new();
    let mut no_mb_way_key = settings();
    no_mb_way_key.mb_way_key = String::new();

    let mut no_local_id = OrderPayment::new(1, dec!(10));
    no_local_id.local_id = None;

    let cases = vec![
        (no_gateway_key, OrderPayment::new(1, dec!(10))),
        (no_mb_way_key, OrderPayment::new(1, dec!(10))),
        (settings(), no_local_id),
        (settings(), OrderPayment::new(1, dec!(0))),
    ];

    for (case_settings, mut payment) in cases {
        let gateway = RecordingGateway::responding(200u16, "ok");
        let payments = InMemoryPaymentStore::new();
        let provider = provider(case_settings, gateway.clone(), payments.clone());

        let err = provider
            .execute_payment(&CheckoutRequest::default(), &mut payment)
            .await
            .unwrap_err();

        assert!(err.is_configuration(), "expected configuration error, got {err:?}");
        assert_eq!(gateway.calls(), 0);
        assert_eq!(payments.save_count(), 0);
        assert_eq!(payment.state, PaymentState::Created);
        assert_eq!(
            err.user_message(),
            "We were unable to process your payment. See below for details on how to proceed."
        );
    }
}

#[tokio::test]
async fn test_truncated_order_id_is_sent() {
    let gateway = RecordingGateway::responding(200u16, "ok");
    let provider = provider(settings(), gateway.clone(), InMemoryPaymentStore::new());

    let mut payment = OrderPayment::new(12_000_000_000_000_345, dec!(1));
    provider
        .execute_payment(&CheckoutRequest::default(), &mut payment)
        .await
        .unwrap();

    assert_eq!(gateway.last_request().unwrap().order_id.to_string(), "345");
    assert_eq!(provider.matching_id(&payment).as_deref(), Some("345"));
}

#[tokio::test]
async fn test_payments_past_created_are_never_resent() {
    for state in [
        PaymentState::Pending,
        PaymentState::Confirmed,
        PaymentState::Failed,
        PaymentState::Canceled,
        PaymentState::Refunded,
    ] {
        let gateway = RecordingGateway::responding(200u16, "ok");
        let payments = InMemoryPaymentStore::new();
        let provider = provider(settings(), gateway.clone(), payments.clone());

        let mut payment = OrderPayment::new(42, dec!(25.5));
        payment.state = state;
        let err = provider
            .execute_payment(&CheckoutRequest::default(), &mut payment)
            .await
            .unwrap_err();

        assert!(err.is_configuration(), "{state}: {err:?}");
        assert_eq!(payment.state, state);
        assert_eq!(gateway.calls(), 0, "{state}");
        assert_eq!(payments.save_count(), 0, "{state}");
    }
}

#[tokio::test]
async fn test_save_failure_leaves_payment_created() {
    let gateway = RecordingGateway::responding(200u16, "ok");
    let provider = MbWayProvider::new(
        event(),
        settings(),
        Box::new(gateway.clone()),
        Box::new(FailingPaymentStore),
    );

    let mut payment = OrderPayment::new(42, dec!(25.5));
    let err = provider
        .execute_payment(&CheckoutRequest::default(), &mut payment)
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::Storage(ref msg) if msg == "db down"));
    assert_eq!(payment.state, PaymentState::Created);
    assert_eq!(gateway.calls(), 1);
}
