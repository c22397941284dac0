//! Read-only projections of payment sessions for payers and callers
//!
//! Every read path starts with an explicit expiry reconciliation: a pending
//! session whose deadline has passed is persisted as expired before it is
//! projected. That is the only write a read can cause, and it never touches
//! paid or cancelled sessions.

use std::sync::Arc;

use crate::config::app_config::PaymentConfig;
use crate::domain::session::{donate_order_id, PaymentSession, PaymentStatus};
use crate::domain::token::PaymentRequestData;
use crate::infrastructure::adapters::SessionStore;
use crate::shared::error::{AppError, AppResult};
use crate::shared::logging::LoggingUtils;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Payer-facing projection of a session
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PayerView {
    Live(LivePaymentView),
    Expired(ExpiredView),
    /// Session already paid; the payer is sent back to the originating service
    PaidRedirect { redirect_url: String },
}

/// Live (pending) payment page data
#[derive(Debug, Clone, Serialize)]
pub struct LivePaymentView {
    pub status: PaymentStatus,
    pub order_id: String,
    pub amount: i64,
    pub description: String,
    pub qr_url: String,
    pub account_number: String,
    pub return_url: String,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
    /// Seconds until expiry, clamped at zero
    pub time_remaining: i64,
}

/// Expired payment page data
#[derive(Debug, Clone, Serialize)]
pub struct ExpiredView {
    pub status: PaymentStatus,
    pub order_id: String,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
    /// Window length the payer had, in whole minutes
    pub expired_minutes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

/// Polling projection for the originating service's frontend
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub order_id: String,
    pub status: PaymentStatus,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

/// Donation-split summary attached to paid parents
#[derive(Debug, Clone, Serialize)]
pub struct DonateSplitView {
    pub order_id: String,
    pub amount: i64,
}

/// Full session snapshot for the originating service's backend
#[derive(Debug, Clone, Serialize)]
pub struct InfoView {
    pub order_id: String,
    pub amount: i64,
    pub description: String,
    pub status: PaymentStatus,
    pub payment_type: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donate_split: Option<DonateSplitView>,
}

/// Derives user-facing view data from session state
pub struct PresenterService {
    store: Arc<SessionStore>,
    payment: PaymentConfig,
}

impl PresenterService {
    pub fn new(store: Arc<SessionStore>, payment: PaymentConfig) -> Self {
        Self { store, payment }
    }

    /// Persist a pending session as expired once its deadline passed
    ///
    /// Returns the session to project and whether this read expired it.
    /// Caller must hold the order guard.
    async fn reconcile_expiry(&self, session: PaymentSession) -> AppResult<(PaymentSession, bool)> {
        if session.status != PaymentStatus::Pending || !session.is_expired() {
            return Ok((session, false));
        }

        let mut expired = session;
        expired.status = PaymentStatus::Expired;
        self.store.put(&expired).await?;
        LoggingUtils::log_transition(&expired.order_id, "pending", "expired", expired.amount, None);
        Ok((expired, true))
    }

    /// Materialize the session for a decrypted payment request and project it
    pub async fn present_payment(&self, data: &PaymentRequestData) -> AppResult<PayerView> {
        let _guard = self.store.lock_order(&data.order_id).await;

        let candidate = PaymentSession::from_request(data, Utc::now())?;
        let (session, created) = self.store.get_or_create(candidate).await?;
        if created {
            info!(order_id = %session.order_id, amount = session.amount, "Created payment session");
        }

        let (session, _) = self.reconcile_expiry(session).await?;

        match session.status {
            PaymentStatus::Paid => Ok(PayerView::PaidRedirect {
                redirect_url: self.success_redirect(&session).await?,
            }),
            PaymentStatus::Expired => Ok(PayerView::Expired(Self::expired_view(&session))),
            PaymentStatus::Pending | PaymentStatus::Cancelled => {
                let time_remaining = (session.expired_at - Utc::now()).num_seconds().max(0);
                Ok(PayerView::Live(LivePaymentView {
                    status: session.status,
                    order_id: session.order_id.clone(),
                    amount: session.amount,
                    description: session.description.clone(),
                    qr_url: session.qr_url(&self.payment.qr_bank_code, &self.payment.qr_template),
                    account_number: session.account_number.clone(),
                    return_url: session.return_url.clone(),
                    created_at: session.created_at,
                    expired_at: session.expired_at,
                    time_remaining,
                }))
            }
        }
    }

    /// Status projection used by frontend polling
    pub async fn present_status(&self, order_id: &str) -> AppResult<StatusView> {
        let _guard = self.store.lock_order(order_id).await;

        let session = self
            .store
            .get(order_id)
            .await?
            .ok_or_else(|| AppError::SessionNotFound { order_id: order_id.to_string() })?;

        let (session, expired_now) = self.reconcile_expiry(session).await?;

        let return_url = if session.status == PaymentStatus::Paid {
            Some(self.success_redirect(&session).await?)
        } else if expired_now {
            // The poll that observes the expiry carries the cancellation
            // redirect; later polls just report the state
            Some(format!(
                "{}?order_id={}&status=cancelled",
                session.return_url, session.order_id
            ))
        } else {
            None
        };

        Ok(StatusView {
            order_id: session.order_id.clone(),
            status: session.status,
            amount: session.amount,
            return_url,
        })
    }

    /// Full snapshot; never mutates
    pub async fn present_info(&self, order_id: &str) -> AppResult<InfoView> {
        let session = self
            .store
            .get(order_id)
            .await?
            .ok_or_else(|| AppError::SessionNotFound { order_id: order_id.to_string() })?;

        let donate_split = if session.status == PaymentStatus::Paid {
            self.paid_donate_split(&session.order_id).await?
        } else {
            None
        };

        Ok(InfoView {
            order_id: session.order_id.clone(),
            amount: session.amount,
            description: session.description.clone(),
            status: session.status,
            payment_type: session.payment_type.clone(),
            username: session.username.clone(),
            created_at: session.created_at,
            expired_at: session.expired_at,
            paid_at: session.paid_at,
            donate_split: donate_split.map(|s| DonateSplitView {
                order_id: s.order_id,
                amount: s.amount,
            }),
        })
    }

    /// Success redirect back to the originating service, augmented with the
    /// donation split when one exists
    async fn success_redirect(&self, session: &PaymentSession) -> AppResult<String> {
        let mut url = format!(
            "{}?order_id={}&status=success&type={}&amount={}",
            session.return_url, session.order_id, session.payment_type, session.amount
        );

        if let Some(donate) = self.paid_donate_split(&session.order_id).await? {
            info!(
                order_id = %session.order_id,
                donate_order_id = %donate.order_id,
                donate_amount = donate.amount,
                "Found donate split session"
            );
            url.push_str(&format!(
                "&donate_order_id={}&donate_amount={}",
                donate.order_id, donate.amount
            ));
        }

        Ok(url)
    }

    async fn paid_donate_split(&self, order_id: &str) -> AppResult<Option<PaymentSession>> {
        let Some(donate_id) = donate_order_id(order_id) else {
            return Ok(None);
        };
        Ok(self
            .store
            .get(&donate_id)
            .await?
            .filter(|s| s.status == PaymentStatus::Paid))
    }

    fn expired_view(session: &PaymentSession) -> ExpiredView {
        let expired_minutes = (session.expired_at - session.created_at).num_minutes();
        let return_url = if session.return_url.is_empty() {
            None
        } else {
            Some(session.base_return_url().to_string())
        };

        ExpiredView {
            status: PaymentStatus::Expired,
            order_id: session.order_id.clone(),
            created_at: session.created_at,
            expired_at: session.expired_at,
            expired_minutes,
            return_url,
        }
    }
}
