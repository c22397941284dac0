//! Payment session domain model and lifecycle types

use crate::domain::token::PaymentRequestData;
use crate::shared::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum digit count for an order id embedded in a transfer description
pub const MIN_ORDER_ID_DIGITS: usize = 10;

/// Payment session lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Expired,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Expired => "expired",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment session persisted in the store
///
/// `order_id` is externally assigned and unique; everything except the
/// lifecycle fields (`status`, `transaction_id`, `paid_at`) is fixed at
/// creation. The only sanctioned mutation outside a pending→terminal
/// transition is the payment_type/amount rewrite that happens inside the
/// same transition when a mismatched monthly payment is reclassified as a
/// donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    pub order_id: String,
    pub amount: i64,
    pub description: String,
    pub account_number: String,
    pub return_url: String,
    pub username: Option<String>,
    pub payment_type: String,
    pub per_month_price: Option<i64>,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

impl PaymentSession {
    /// Build a fresh pending session from a decrypted payment request
    pub fn from_request(data: &PaymentRequestData, now: DateTime<Utc>) -> AppResult<Self> {
        let expired_at = DateTime::<Utc>::from_timestamp(data.expired_at, 0)
            .ok_or_else(|| AppError::Validation(format!("invalid expired_at timestamp: {}", data.expired_at)))?;

        Ok(Self {
            order_id: data.order_id.clone(),
            amount: data.amount,
            description: data.description.clone(),
            account_number: data.account_number.clone(),
            return_url: data.return_url.clone(),
            username: data.username.clone(),
            payment_type: data.payment_type.clone(),
            per_month_price: data.per_month_price,
            status: PaymentStatus::Pending,
            transaction_id: None,
            paid_at: None,
            created_at: now,
            expired_at,
        })
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expired_at
    }

    /// Compose the VietQR image URL for this session
    ///
    /// The bridge never fetches this URL; it is handed to the frontend
    /// verbatim, matching the upstream image service's format:
    /// `https://img.vietqr.io/image/{bank}-{account}-{template}.png`
    pub fn qr_url(&self, bank_code: &str, template: &str) -> String {
        format!(
            "https://img.vietqr.io/image/{}-{}-{}.png?amount={}&addInfo={}",
            bank_code, self.account_number, template, self.amount, self.description
        )
    }

    /// Return URL with any query string stripped
    pub fn base_return_url(&self) -> &str {
        self.return_url.split('?').next().unwrap_or(&self.return_url)
    }
}

/// Derive the order id a donation split is recorded under
///
/// The originating service dereferences the split by `order_id + 1`; the
/// arithmetic is an external contract, kept behind this helper so an
/// explicit parent reference could replace it in one place. Non-numeric or
/// overflowing ids yield None.
pub fn donate_order_id(order_id: &str) -> Option<String> {
    order_id
        .parse::<u128>()
        .ok()
        .and_then(|n| n.checked_add(1))
        .map(|n| n.to_string())
}
