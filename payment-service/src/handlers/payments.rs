//! Payment endpoints under `/api/payments`.

use crate::{middleware::AmountParam, models::Amount, services::record_payment};

pub const CURRENCY_SYMBOL: &str = "₹";
pub const STATUS_MESSAGE: &str = "Payment service is running!";

/// Accept a payment amount and confirm it. Nothing is charged or stored.
pub async fn submit_payment(AmountParam(amount): AmountParam) -> String {
    tracing::info!(amount = %amount, "Processing payment");
    record_payment();

    confirmation_message(amount)
}

pub async fn payment_status() -> &'static str {
    STATUS_MESSAGE
}

pub fn confirmation_message(amount: Amount) -> String {
    format!(
        "Payment of {}{} processed successfully!",
        CURRENCY_SYMBOL, amount
    )
}
