//! In-memory wizard sessions and the sweeper that releases lapsed holds.
//!
//! Each session owns one `StepController` behind an async mutex. Handlers
//! take the lock with `try_lock`, so a second action sent while one is in
//! flight is rejected instead of queued. Sessions left alone for longer than
//! the idle TTL are closed by the sweeper.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use brightbook_core::{
    backend::BookingBackend,
    errors::{BookingError, BookingResult},
    wizard::StepController,
};
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ApiState;

pub type SharedWizard = Arc<Mutex<StepController>>;

struct SessionEntry {
    wizard: SharedWizard,
    /// Unix seconds of the last lookup.
    last_active: AtomicI64,
}

impl SessionEntry {
    fn touch(&self, now: DateTime<Utc>) {
        self.last_active.store(now.timestamp(), Ordering::Relaxed);
    }

    fn idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_active.load(Ordering::Relaxed) <= cutoff.timestamp()
    }
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<SessionEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, hold_seconds: u32) -> (Uuid, SharedWizard) {
        let id = Uuid::new_v4();
        let wizard = Arc::new(Mutex::new(StepController::new(hold_seconds)));
        let entry = SessionEntry {
            wizard: wizard.clone(),
            last_active: AtomicI64::new(Utc::now().timestamp()),
        };
        self.sessions.write().await.insert(id, Arc::new(entry));
        debug!(session_id = %id, "wizard session created");
        (id, wizard)
    }

    /// Looks a session up and marks it active.
    pub async fn get(&self, id: Uuid) -> BookingResult<SharedWizard> {
        let sessions = self.sessions.read().await;
        let entry = sessions
            .get(&id)
            .ok_or_else(|| BookingError::NotFound(format!("Wizard session {} not found", id)))?;
        entry.touch(Utc::now());
        Ok(entry.wizard.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<SharedWizard> {
        self.sessions.write().await.remove(&id).map(|entry| entry.wizard.clone())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn snapshot(&self) -> Vec<(Uuid, Arc<SessionEntry>)> {
        self.sessions
            .read()
            .await
            .iter()
            .map(|(id, entry)| (*id, entry.clone()))
            .collect()
    }
}

/// Locks a session for one action, failing with `Conflict` while another
/// action on the same session is still running.
pub fn lock_session(wizard: &SharedWizard) -> BookingResult<MutexGuard<'_, StepController>> {
    wizard.try_lock().map_err(|_| {
        BookingError::Conflict("another action is in progress for this booking".to_string())
    })
}

/// Moves a lapsed hold to `Expired` and gives its slots back.
pub async fn release_if_expired(
    wizard: &mut StepController,
    backend: &dyn BookingBackend,
    now: DateTime<Utc>,
) -> Option<Uuid> {
    let booking_id = wizard.expire_if_due(now)?;
    match backend.release_booking(booking_id).await {
        Ok(()) => info!(%booking_id, "expired booking hold released"),
        Err(e) => warn!(%booking_id, error = %e, "failed to release expired booking hold"),
    }
    Some(booking_id)
}

/// Releases the lapsed holds of every idle session. Busy sessions are left
/// for the next run.
pub async fn sweep_expired(
    sessions: &SessionStore,
    backend: &dyn BookingBackend,
    now: DateTime<Utc>,
) -> Vec<Uuid> {
    let mut released = Vec::new();
    for (session_id, entry) in sessions.snapshot().await {
        let Ok(mut wizard) = entry.wizard.try_lock() else {
            debug!(%session_id, "session busy, skipping expiry check");
            continue;
        };
        if let Some(booking_id) = release_if_expired(&mut wizard, backend, now).await {
            released.push(booking_id);
        }
    }
    released
}

/// Drops the wizard's work, giving back the slots of a blocked booking.
pub async fn abandon(wizard: &mut StepController, backend: &dyn BookingBackend) -> BookingResult<()> {
    if wizard.hold().is_blocked() {
        wizard.cancel()?;
        wizard.confirm_cancel(backend).await?;
    }
    Ok(())
}

/// Removes sessions nobody has touched for `idle_ttl`. A blocked booking is
/// released first; busy sessions and sessions whose release fails are kept.
pub async fn evict_idle(
    sessions: &SessionStore,
    backend: &dyn BookingBackend,
    now: DateTime<Utc>,
    idle_ttl: chrono::Duration,
) -> Vec<Uuid> {
    let Some(cutoff) = now.checked_sub_signed(idle_ttl) else {
        return Vec::new();
    };
    let mut evicted = Vec::new();
    for (session_id, entry) in sessions.snapshot().await {
        if !entry.idle_since(cutoff) {
            continue;
        }
        let Ok(mut wizard) = entry.wizard.try_lock() else {
            continue;
        };
        if let Err(e) = abandon(&mut wizard, backend).await {
            warn!(%session_id, error = %e, "failed to release hold of idle session");
            continue;
        }
        drop(wizard);
        sessions.remove(session_id).await;
        evicted.push(session_id);
    }
    evicted
}

/// Runs the sweeper every `every`. Blocked bookings left behind by sessions
/// that no longer exist are released from the database as well, and sessions
/// idle for longer than `idle_ttl` are closed.
pub fn spawn_expiry_sweeper(state: Arc<ApiState>, every: Duration, idle_ttl: Duration) -> JoinHandle<()> {
    let idle_ttl = chrono::Duration::from_std(idle_ttl).unwrap_or(chrono::Duration::MAX);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let now = Utc::now();

            let released = sweep_expired(&state.sessions, state.backend.as_ref(), now).await;
            if !released.is_empty() {
                info!(count = released.len(), "released lapsed holds of wizard sessions");
            }

            let evicted = evict_idle(&state.sessions, state.backend.as_ref(), now, idle_ttl).await;
            if !evicted.is_empty() {
                info!(count = evicted.len(), "closed idle wizard sessions");
            }

            match brightbook_db::repositories::booking::expired_booking_ids(&state.db_pool, now).await {
                Ok(orphaned) => {
                    for booking_id in orphaned {
                        if let Err(e) = state.backend.release_booking(booking_id).await {
                            warn!(%booking_id, error = %e, "failed to release orphaned booking hold");
                        }
                    }
                }
                Err(e) => warn!(error = %e, "failed to look up expired booking holds"),
            }
        }
    })
}
