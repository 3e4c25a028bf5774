use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::{debug, warn};
use uuid::Uuid;

use super::{Flash, FlashStatus};

/// Name of the cookie carrying the session identifier.
pub const SESSION_COOKIE: &str = "ams-session";

/// Pending flashes older than this are dropped unread.
pub const DEFAULT_FLASH_TTL: Duration = Duration::from_secs(10 * 60);

/// Most sessions holding unread flashes at any time.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

struct PendingFlashes {
    created: Instant,
    flashes: Vec<Flash>,
}

/// In-memory flash messages keyed by session identifier.
///
/// Messages are queued by `add` and drained by `take`; nothing survives a
/// restart. Sessions nobody comes back for are evicted on `add`, once they
/// outlive `ttl` or when `max_sessions` is reached (oldest first).
///
/// # Fields Overview
///
/// - `flashes`: unread messages per session with the time the entry was opened
/// - `ttl`: lifetime of an unread entry
/// - `max_sessions`: capacity of the store
pub struct FlashStore {
    flashes: Mutex<HashMap<Uuid, PendingFlashes>>,
    ttl: Duration,
    max_sessions: usize,
}

impl Default for FlashStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_FLASH_TTL, DEFAULT_MAX_SESSIONS)
    }
}

impl FlashStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            flashes: Mutex::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Returns the session named by the cookie value, or a fresh one when the
    /// cookie is missing or malformed. The flag is true for a new session.
    pub fn resolve_session(cookie: Option<&str>) -> (Uuid, bool) {
        match cookie.map(Uuid::parse_str) {
            Some(Ok(id)) => (id, false),
            Some(Err(_)) => {
                debug!("Ignoring malformed session cookie");
                (Uuid::new_v4(), true)
            }
            None => (Uuid::new_v4(), true),
        }
    }

    pub fn add<S: Into<String>>(&self, session: Uuid, status: FlashStatus, message: S) {
        let mut flashes = match self.flashes.lock() {
            Ok(flashes) => flashes,
            Err(_) => {
                warn!("Flash store lock poisoned, dropping message");
                return;
            }
        };

        let now = Instant::now();
        let ttl = self.ttl;
        flashes.retain(|_, pending| now.duration_since(pending.created) < ttl);

        if !flashes.contains_key(&session) {
            while flashes.len() >= self.max_sessions {
                let oldest = flashes
                    .iter()
                    .min_by_key(|(_, pending)| pending.created)
                    .map(|(id, _)| *id);
                match oldest {
                    Some(id) => {
                        debug!("Evicting unread flashes of session {}", id);
                        flashes.remove(&id);
                    }
                    None => break,
                }
            }
        }

        flashes
            .entry(session)
            .or_insert_with(|| PendingFlashes {
                created: now,
                flashes: Vec::new(),
            })
            .flashes
            .push(Flash {
                status,
                message: message.into(),
            });
    }

    /// Drains and returns every pending flash of the session.
    pub fn take(&self, session: Uuid) -> Vec<Flash> {
        match self.flashes.lock() {
            Ok(mut flashes) => flashes
                .remove(&session)
                .map(|pending| pending.flashes)
                .unwrap_or_default(),
            Err(_) => {
                warn!("Flash store lock poisoned, no messages returned");
                Vec::new()
            }
        }
    }

    /// Number of sessions holding unread flashes.
    pub fn session_count(&self) -> usize {
        self.flashes.lock().map(|flashes| flashes.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_take_drains() {
        let store = FlashStore::new();
        let session = Uuid::new_v4();
        store.add(session, FlashStatus::Success, "3/3 new silences created");
        store.add(session, FlashStatus::Danger, "'1' request(s) could not be completed");

        let flashes = store.take(session);
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].status, FlashStatus::Success);
        assert_eq!(flashes[1].message, "'1' request(s) could not be completed");

        assert!(store.take(session).is_empty());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = FlashStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.add(a, FlashStatus::Success, "for a");

        assert!(store.take(b).is_empty());
        assert_eq!(store.take(a).len(), 1);
    }

    #[test]
    fn test_resolve_session() {
        let id = Uuid::new_v4();
        assert_eq!(FlashStore::resolve_session(Some(&id.to_string())), (id, false));

        let (_, fresh) = FlashStore::resolve_session(Some("garbage"));
        assert!(fresh);
        let (_, fresh) = FlashStore::resolve_session(None);
        assert!(fresh);
    }

    #[test]
    fn test_store_is_capped() {
        let store = FlashStore::with_limits(DEFAULT_FLASH_TTL, 10);
        let sessions: Vec<Uuid> = (0..100).map(|_| Uuid::new_v4()).collect();
        for session in &sessions {
            store.add(*session, FlashStatus::Success, "1/1 new silences created");
        }

        assert_eq!(store.session_count(), 10);
        assert_eq!(store.take(sessions[99]).len(), 1);
    }

    #[test]
    fn test_existing_session_is_not_evicted_for_itself() {
        let store = FlashStore::with_limits(DEFAULT_FLASH_TTL, 1);
        let session = Uuid::new_v4();
        store.add(session, FlashStatus::Success, "first");
        store.add(session, FlashStatus::Danger, "second");

        assert_eq!(store.session_count(), 1);
        assert_eq!(store.take(session).len(), 2);
    }

    #[test]
    fn test_stale_sessions_expire() {
        let store = FlashStore::with_limits(Duration::ZERO, DEFAULT_MAX_SESSIONS);
        let abandoned = Uuid::new_v4();
        store.add(abandoned, FlashStatus::Success, "never read");
        store.add(Uuid::new_v4(), FlashStatus::Success, "fresh");

        assert!(store.take(abandoned).is_empty());
    }
}
