//! Candidate URL intake pipeline.
//!
//! Upstream collaborators (network observation, DOM observation) feed raw
//! locators here, fire-and-forget. The pipeline canonicalizes, probes,
//! classifies, derives a filename, and inserts into the session registry —
//! tolerating the same URL arriving many times: the probe cache collapses
//! duplicate network cost and the registry insert is idempotent.

use crate::canonical::canonicalize;
use crate::classify::classify;
use crate::filename::derive_filename;
use crate::types::{Event, MediaItem, Provenance, SessionId};

use super::MediaScout;

impl MediaScout {
    /// Submit a candidate URL observed in the session
    ///
    /// Fire-and-forget: the probe/classify pipeline runs in a spawned task
    /// and the caller is never blocked. Accepted items surface through
    /// [`Event::ItemAdded`].
    pub fn submit_candidate(&self, session: SessionId, url: &str, provenance: Provenance) {
        let scout = self.clone();
        let url = url.to_string();
        tokio::spawn(async move {
            scout.process_candidate(session, &url, provenance).await;
        });
    }

    /// Run the candidate pipeline to completion
    ///
    /// Returns `true` if the candidate was newly inserted into the session's
    /// registry. This is the awaitable form of [`MediaScout::submit_candidate`].
    pub async fn process_candidate(
        &self,
        session: SessionId,
        url: &str,
        provenance: Provenance,
    ) -> bool {
        let canonical = canonicalize(&self.config.canonicalize, url);

        let probe = self.probe_cache.probe(&canonical).await;
        let verdict = classify(&self.config.probe, &probe);

        if !verdict.should_keep() {
            tracing::debug!(
                url = %canonical,
                provenance = ?provenance,
                valid_media = verdict.is_valid_media,
                fragment = verdict.is_fragment,
                "candidate rejected"
            );
            return false;
        }

        let filename = derive_filename(
            probe.content_disposition.as_deref(),
            probe.content_type.as_deref(),
            &canonical,
        );

        let item = MediaItem {
            url: canonical,
            filename,
            is_valid_media: verdict.is_valid_media,
            is_manifest: verdict.is_manifest,
            is_fragment: verdict.is_fragment,
        };

        // First acceptance wins; concurrent duplicates are suppressed here
        let inserted = self.registry.add_if_new(session, item.clone());
        if inserted {
            self.emit_event(Event::ItemAdded {
                session_id: session,
                item,
            });
        }
        inserted
    }
}
