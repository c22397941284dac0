//! Payment session store
//!
//! Ownership boundary for all session mutations. The authoritative copy is
//! an in-process map; an optional Redis mirror provides warm-restart
//! durability. Callers that run a fetch-check-mutate sequence must hold the
//! per-order guard from [`SessionStore::lock_order`] across the whole
//! sequence.

use crate::domain::session::PaymentSession;
use crate::shared::error::{AppError, AppResult};
use redis::{aio::ConnectionManager, AsyncCommands};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Mirror TTL: sessions outlive their payment window by a wide margin so
/// late webhook redeliveries still reconcile
const MIRROR_TTL_SECONDS: u64 = 48 * 3600;

/// Abstraction for persisting payment sessions
#[derive(Clone)]
pub struct SessionStore {
    redis: Option<Arc<ConnectionManager>>, // optional; memory-only if None
    memory: Arc<RwLock<HashMap<String, PaymentSession>>>,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl SessionStore {
    pub fn new(redis: Option<Arc<ConnectionManager>>) -> Self {
        Self {
            redis,
            memory: Arc::new(RwLock::new(HashMap::new())),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn key(order_id: &str) -> String {
        format!("payment_sessions:{}", order_id)
    }

    /// Acquire the mutual-exclusion guard for one order id
    ///
    /// Serializes concurrent webhook deliveries and expire-on-read against
    /// the same session. Split sessions are only ever written in the same
    /// commit as their parent, so locking the parent id is sufficient.
    pub async fn lock_order(&self, order_id: &str) -> OwnedMutexGuard<()> {
        let cell = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(order_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        cell.lock_owned().await
    }

    pub async fn get(&self, order_id: &str) -> AppResult<Option<PaymentSession>> {
        if let Some(session) = self.memory.read().await.get(order_id).cloned() {
            return Ok(Some(session));
        }

        // Memory miss: fall back to the mirror (fresh process, warm Redis)
        if let Some(redis) = &self.redis {
            let mut conn = (**redis).clone();
            let data: Option<Vec<u8>> = conn
                .get(Self::key(order_id))
                .await
                .map_err(|e| AppError::Store(format!("redis get: {}", e)))?;
            if let Some(bytes) = data {
                let session: PaymentSession = serde_json::from_slice(&bytes)
                    .map_err(|e| AppError::Store(format!("deserialize session: {}", e)))?;
                self.memory.write().await.insert(order_id.to_string(), session.clone());
                return Ok(Some(session));
            }
        }

        Ok(None)
    }

    pub async fn put(&self, session: &PaymentSession) -> AppResult<()> {
        self.put_many(std::slice::from_ref(session), &[]).await
    }

    /// Atomically commit several sessions, enforcing uniqueness for ids in
    /// `new_ids`
    ///
    /// Used for the split transition where the parent update and the donate
    /// insert must land together. The mirror is written before the
    /// authoritative map; a mirror failure aborts the commit with no memory
    /// change, and the unique check on `new_ids` is the final backstop
    /// against double-creation.
    pub async fn put_many(&self, sessions: &[PaymentSession], new_ids: &[&str]) -> AppResult<()> {
        let mut memory = self.memory.write().await;

        for id in new_ids {
            if memory.contains_key(*id) {
                return Err(AppError::Store(format!("order {} already exists", id)));
            }
        }

        let mut serialized = Vec::with_capacity(sessions.len());
        for session in sessions {
            let bytes = serde_json::to_vec(session)
                .map_err(|e| AppError::Store(format!("serialize session: {}", e)))?;
            serialized.push((Self::key(&session.order_id), bytes));
        }

        if let Some(redis) = &self.redis {
            let mut conn = (**redis).clone();
            for (key, bytes) in &serialized {
                let _: () = conn
                    .set_ex(key, bytes.as_slice(), MIRROR_TTL_SECONDS)
                    .await
                    .map_err(|e| AppError::Store(format!("redis set: {}", e)))?;
            }
        }

        for session in sessions {
            memory.insert(session.order_id.clone(), session.clone());
        }

        Ok(())
    }

    /// Idempotent get-or-create keyed on order id
    ///
    /// Returns the stored session and whether this call created it. The
    /// caller must hold the order guard so a concurrent create cannot
    /// interleave.
    pub async fn get_or_create(&self, candidate: PaymentSession) -> AppResult<(PaymentSession, bool)> {
        if let Some(existing) = self.get(&candidate.order_id).await? {
            return Ok((existing, false));
        }

        self.put_many(std::slice::from_ref(&candidate), &[&candidate.order_id]).await?;
        Ok((candidate, true))
    }
}
