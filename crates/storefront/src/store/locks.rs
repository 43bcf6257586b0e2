use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use quartermaster_core::SessionId;
use tokio::sync::Mutex;

/// How long an unused per-session lock is kept.
const LOCK_IDLE: Duration = Duration::from_secs(30 * 60);

/// Per-session mutexes that serialize cart mutations.
///
/// Entries are never evicted by size, only after sitting idle, so a lock in
/// use cannot be replaced underneath its holder.
#[derive(Clone)]
pub struct CartLocks {
    locks: Cache<SessionId, Arc<Mutex<()>>>,
}

impl CartLocks {
    #[must_use]
    pub fn new() -> Self {
        Self {
            locks: Cache::builder().time_to_idle(LOCK_IDLE).build(),
        }
    }

    /// The mutex for `session_id`, created on first use.
    #[must_use]
    pub fn for_session(&self, session_id: &SessionId) -> Arc<Mutex<()>> {
        self.locks
            .get_with(session_id.clone(), || Arc::new(Mutex::new(())))
    }
}

impl Default for CartLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CartLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartLocks")
            .field("sessions", &self.locks.entry_count())
            .finish()
    }
}
