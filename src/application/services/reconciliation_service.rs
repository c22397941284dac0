//! Reconciliation of verified bank transactions against payment sessions
//!
//! This is the state machine that decides what a webhook delivery does to a
//! session: confirm it, detect a duplicate, reject a conflicting payment,
//! or apply the split/convert-to-donation policy for mismatched amounts.

use std::sync::Arc;

use crate::config::app_config::PaymentConfig;
use crate::domain::session::{donate_order_id, PaymentSession, PaymentStatus};
use crate::domain::webhook::WebhookTransaction;
use crate::infrastructure::adapters::SessionStore;
use crate::shared::error::{AppError, AppResult};
use crate::shared::logging::LoggingUtils;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

/// Result of applying one webhook transaction
///
/// The flags are derived from which branch fired and are independent of
/// each other; all of them can accompany a successful reconciliation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub order_id: String,
    pub already_processed: bool,
    pub amount_mismatch: bool,
    pub split_payment: bool,
    pub converted_to_donate: bool,
}

impl ReconcileOutcome {
    fn clean(order_id: String) -> Self {
        Self {
            order_id,
            already_processed: false,
            amount_mismatch: false,
            split_payment: false,
            converted_to_donate: false,
        }
    }
}

/// Applies verified webhook transactions to the session store
pub struct ReconciliationService {
    store: Arc<SessionStore>,
    payment: PaymentConfig,
}

impl ReconciliationService {
    pub fn new(store: Arc<SessionStore>, payment: PaymentConfig) -> Self {
        Self { store, payment }
    }

    /// Apply one authenticated transaction
    ///
    /// The whole fetch-check-mutate sequence runs under the per-order
    /// guard, so two near-simultaneous deliveries for the same order
    /// serialize; the loser of the race lands in the idempotent-duplicate
    /// or already-paid branch instead of double-confirming.
    pub async fn apply_transaction(&self, tx: &WebhookTransaction) -> AppResult<ReconcileOutcome> {
        let order_id = tx.order_id()?;

        let _guard = self.store.lock_order(&order_id).await;

        let session = self
            .store
            .get(&order_id)
            .await?
            .ok_or_else(|| AppError::SessionNotFound { order_id: order_id.clone() })?;

        if session.status == PaymentStatus::Paid {
            if session.transaction_id.as_deref() == Some(tx.id.as_str()) {
                // Exact redelivery of an applied transaction; report success
                // without touching anything
                info!(order_id = %order_id, transaction_id = %tx.id, "Payment already processed (idempotent)");
                let mut outcome = ReconcileOutcome::clean(order_id);
                outcome.already_processed = true;
                return Ok(outcome);
            }

            warn!(
                order_id = %order_id,
                transaction_id = %tx.id,
                recorded_transaction_id = session.transaction_id.as_deref(),
                "Order already paid with a different transaction"
            );
            return Err(AppError::AlreadyPaid { order_id });
        }

        let now = Utc::now();
        let old_status = session.status;
        let mut updated = session.clone();
        let mut outcome = ReconcileOutcome::clean(order_id.clone());
        let mut split_session: Option<PaymentSession> = None;

        if session.amount != tx.amount {
            outcome.amount_mismatch = true;
            warn!(
                order_id = %order_id,
                expected = session.amount,
                received = tx.amount,
                "Amount mismatch"
            );

            if session.payment_type == self.payment.monthly_fund_type && tx.amount > session.amount {
                let surplus = tx.amount - session.amount;

                match donate_order_id(&order_id) {
                    Some(donate_id) => {
                        info!(order_id = %order_id, surplus = surplus, "Amount surplus detected, splitting");
                        split_session = Some(PaymentSession {
                            order_id: donate_id,
                            amount: surplus,
                            description: format!("Surplus donation from {}", session.description),
                            account_number: session.account_number.clone(),
                            return_url: session.return_url.clone(),
                            username: session.username.clone(),
                            payment_type: self.payment.donate_type.clone(),
                            per_month_price: session.per_month_price,
                            status: PaymentStatus::Paid,
                            transaction_id: Some(format!("{}_split", tx.id)),
                            paid_at: Some(now),
                            created_at: now,
                            expired_at: session.expired_at,
                        });
                        outcome.split_payment = true;
                    }
                    None => {
                        // No representable successor id; accept the payment
                        // whole rather than lose it
                        warn!(order_id = %order_id, "Cannot derive donate order id, skipping split");
                    }
                }
            } else if session.payment_type == self.payment.monthly_fund_type {
                info!(
                    order_id = %order_id,
                    expected = session.amount,
                    received = tx.amount,
                    "Converting mismatched monthly payment to donation"
                );
                updated.payment_type = self.payment.donate_type.clone();
                updated.amount = tx.amount;
                outcome.converted_to_donate = true;
            }
            // Any other payment type: accept as-is, mismatch reported via
            // the response flags only
        }

        updated.status = PaymentStatus::Paid;
        updated.transaction_id = Some(tx.id.clone());
        updated.paid_at = Some(now);

        // The parent transition and the split insert must land together
        match &split_session {
            Some(split) => {
                self.store
                    .put_many(&[updated.clone(), split.clone()], &[&split.order_id])
                    .await?
            }
            None => self.store.put(&updated).await?,
        }

        LoggingUtils::log_transition(
            &order_id,
            old_status.as_str(),
            updated.status.as_str(),
            updated.amount,
            Some(&tx.id),
        );
        if let Some(split) = &split_session {
            info!(
                order_id = %order_id,
                donate_order_id = %split.order_id,
                donate_amount = split.amount,
                "Created donate session for surplus"
            );
        }

        Ok(outcome)
    }
}
