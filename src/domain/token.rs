//! Payment request token payload

use serde::{Deserialize, Serialize};

/// Payload carried inside the sealed request token
///
/// Produced by the originating service, opened by the bridge. The `type`
/// field name is part of the wire contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentRequestData {
    pub order_id: String,
    pub amount: i64,
    pub description: String,
    pub account_number: String,
    pub return_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "type")]
    pub payment_type: String,
    #[serde(default)]
    pub per_month_price: Option<i64>,
    /// Absolute expiry, unix seconds; checked strictly at open time
    pub expired_at: i64,
}
