//! Session lifecycle forwarding and the query interface.
//!
//! Sessions are owned by the host's tabs; the host reports closure and
//! navigation here. Purging a session never touches the probe cache — what
//! is known about a URL's nature remains valid cross-session knowledge.

use crate::types::{Event, MediaItem, Navigation, SessionId};

use super::MediaScout;

impl MediaScout {
    /// Items accepted for a session, in insertion order
    pub fn list_items(&self, session: SessionId) -> Vec<MediaItem> {
        self.registry.list(session)
    }

    /// Purge a session's items explicitly
    pub fn clear_session(&self, session: SessionId) {
        if self.registry.clear(session) {
            self.emit_event(Event::SessionCleared {
                session_id: session,
            });
        }
    }

    /// The owning tab was closed
    pub fn on_session_closed(&self, session: SessionId) {
        if self.registry.on_session_closed(session) {
            self.emit_event(Event::SessionCleared {
                session_id: session,
            });
        }
    }

    /// The owning tab navigated
    ///
    /// Only a new top-level document purges the session; same-document URL
    /// changes (hash change, pushState) keep its items.
    pub fn on_session_navigated(&self, session: SessionId, navigation: Navigation) {
        if self.registry.on_session_navigated(session, navigation) {
            self.emit_event(Event::SessionCleared {
                session_id: session,
            });
        }
    }

    /// Purge every session's items
    pub fn clear_all_sessions(&self) {
        self.registry.clear_all();
    }
}
