//! Per-session registry of accepted media items
//!
//! Each browsing session (browser tab) owns an insertion-ordered set of
//! accepted items keyed by canonical URL. Session lifecycle is driven by the
//! host: entries are purged when the tab closes or navigates to a new
//! top-level document. The registry never touches the process-wide probe
//! cache — probe results remain valid cross-session knowledge about a URL.

use crate::types::{MediaItem, Navigation, SessionId};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Insertion-ordered items for one session, with a key set for dedup
#[derive(Debug, Default)]
struct SessionEntries {
    items: Vec<MediaItem>,
    keys: HashSet<String>,
}

/// Registry of accepted media items, partitioned by session
///
/// Interior mutability via a std `Mutex`: all operations are short and never
/// await while holding the lock.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, SessionEntries>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item unless its canonical URL is already present
    ///
    /// Idempotent: re-adding an existing URL is a no-op and returns `false`.
    /// The first acceptance wins insertion order.
    pub fn add_if_new(&self, session: SessionId, item: MediaItem) -> bool {
        let mut sessions = self.lock();
        let entries = sessions.entry(session).or_default();
        if !entries.keys.insert(item.url.clone()) {
            return false;
        }
        tracing::debug!(session_id = session.0, url = %item.url, "media item accepted");
        entries.items.push(item);
        true
    }

    /// Items for a session in insertion order (empty if the session is unknown)
    pub fn list(&self, session: SessionId) -> Vec<MediaItem> {
        self.lock()
            .get(&session)
            .map(|entries| entries.items.clone())
            .unwrap_or_default()
    }

    /// Number of items held for a session
    pub fn len(&self, session: SessionId) -> usize {
        self.lock()
            .get(&session)
            .map(|entries| entries.items.len())
            .unwrap_or(0)
    }

    /// Whether a session holds no items
    pub fn is_empty(&self, session: SessionId) -> bool {
        self.len(session) == 0
    }

    /// Remove all items for a session
    ///
    /// Returns `true` if the session existed and held entries.
    pub fn clear(&self, session: SessionId) -> bool {
        let removed = self.lock().remove(&session);
        match removed {
            Some(entries) => {
                tracing::debug!(
                    session_id = session.0,
                    count = entries.items.len(),
                    "session entries purged"
                );
                !entries.items.is_empty()
            }
            None => false,
        }
    }

    /// Remove all items for all sessions
    pub fn clear_all(&self) {
        self.lock().clear();
    }

    /// The owning tab was closed
    pub fn on_session_closed(&self, session: SessionId) -> bool {
        self.clear(session)
    }

    /// The owning tab navigated
    ///
    /// Only a navigation to a new top-level document purges; a same-document
    /// URL change (hash change, pushState) must not.
    pub fn on_session_navigated(&self, session: SessionId, navigation: Navigation) -> bool {
        match navigation {
            Navigation::NewDocument => self.clear(session),
            Navigation::SameDocument => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, SessionEntries>> {
        // A poisoned lock only happens if an insertion panicked; the data is
        // a plain map of plain values, safe to keep using.
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
