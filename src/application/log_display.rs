use serde::Deserialize;

/// Action type under which gateway notifications are written to the order log.
pub const EVENT_ACTION_TYPE: &str = "pretix.plugins.mbway_via_ifthenpay.event";

#[derive(Deserialize)]
struct LogEntryData {
    event_type: Option<String>,
}

fn describe_event_type(event_type: &str) -> &str {
    match event_type {
        "PAYMENT.SALE.COMPLETED" => "Payment completed.",
        "PAYMENT.SALE.DENIED" => "Payment denied.",
        "PAYMENT.SALE.REFUNDED" => "Payment refunded.",
        "PAYMENT.SALE.REVERSED" => "Payment reversed.",
        "PAYMENT.SALE.PENDING" => "Payment pending.",
        other => other,
    }
}

/// Human-readable line for an order log entry, if it is one of ours.
pub fn logentry_display(action_type: &str, data: &str) -> Option<String> {
    if action_type != EVENT_ACTION_TYPE {
        return None;
    }

    let data: LogEntryData = match serde_json::from_str(data) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!("Unreadable log entry data: {}", e);
            return None;
        }
    };

    let event_type = data.event_type.filter(|t| !t.is_empty())?;
    Some(format!(
        "IfThenPay reported an event: {}",
        describe_event_type(&event_type)
    ))
}
