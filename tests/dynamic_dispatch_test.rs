use mbway_ifthenpay::domain::payment::{OrderPayment, PaymentState};
use mbway_ifthenpay::domain::ports::{PaymentStoreBox, SettingsStoreBox};
use mbway_ifthenpay::infrastructure::in_memory::{InMemoryPaymentStore, InMemorySettingsStore};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_stores_as_trait_objects() {
    let payment_store: PaymentStoreBox = Box::new(InMemoryPaymentStore::new());
    let settings_store: SettingsStoreBox = Box::new(InMemorySettingsStore::new());

    let mut payment = OrderPayment::new(1, dec!(15.0));
    payment.state = PaymentState::Pending;

    // Verify Send + Sync by spawning tasks
    let ps_handle = tokio::spawn(async move {
        payment_store.save(&payment).await.unwrap();
        payment_store.get(1).await.unwrap().unwrap()
    });

    let ss_handle = tokio::spawn(async move {
        settings_store
            .set("fest", "payment_ifthenpay_gateway_key", "GW".to_string())
            .await
            .unwrap();
        settings_store
            .get("fest", "payment_ifthenpay_gateway_key")
            .await
            .unwrap()
    });

    let retrieved = ps_handle.await.unwrap();
    assert_eq!(retrieved.state, PaymentState::Pending);

    let value = ss_handle.await.unwrap();
    assert_eq!(value.as_deref(), Some("GW"));
}
