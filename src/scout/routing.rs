//! Response interception and the forward/fallback follow-up.
//!
//! The cancel/allow decision is produced synchronously from the response
//! headers alone — the network layer cannot be kept waiting on a liveness
//! probe. When a response is taken, the slower work (liveness check, forward
//! to the companion, native fallback) runs in a spawned task and cannot
//! change the already-returned decision.

use crate::filename::derive_filename;
use crate::router::is_download;
use crate::types::{
    ConflictPolicy, Event, ResourceContext, ResponseHeaders, RoutingDecision, SessionId,
};

use super::MediaScout;

impl MediaScout {
    /// Decide what to do with an intercepted response
    ///
    /// Returns immediately with the cancellation decision. If the response
    /// is a download, the native download in flight is cancelled and the
    /// forward/fallback follow-up is scheduled; otherwise the response
    /// proceeds untouched.
    pub fn on_response_headers(
        &self,
        session: SessionId,
        url: &str,
        headers: ResponseHeaders,
        context: ResourceContext,
    ) -> RoutingDecision {
        if !is_download(&headers, context) {
            return RoutingDecision {
                cancel_native_download: false,
            };
        }

        tracing::debug!(url = %url, context = ?context, "response intercepted as download");

        let scout = self.clone();
        let url = url.to_string();
        tokio::spawn(async move {
            scout.route_intercepted(session, &url, &headers).await;
        });

        RoutingDecision {
            cancel_native_download: true,
        }
    }

    /// Forward an intercepted download, falling back to the native primitive
    ///
    /// Alive companion: attempt the forward; a forward failure falls back
    /// once to the native download. Dead companion: native download
    /// directly. If the native path also fails, the failure is surfaced via
    /// [`Event::DownloadFailed`] so the UI can offer a retry.
    pub(crate) async fn route_intercepted(
        &self,
        session: SessionId,
        url: &str,
        headers: &ResponseHeaders,
    ) {
        let filename = derive_filename(
            headers.content_disposition.as_deref(),
            headers.content_type.as_deref(),
            url,
        );

        if self.liveness.check_alive(false).await {
            match self
                .companion
                .forward(&self.liveness.endpoint(), url, Some(&filename))
                .await
            {
                Ok(()) => {
                    self.emit_event(Event::HandledExternally {
                        session_id: session,
                        url: url.to_string(),
                        filename: Some(filename),
                    });
                    return;
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "companion forward failed, falling back to native download");
                }
            }
        } else {
            tracing::debug!(url = %url, "companion not alive, using native download");
        }

        self.native_download(session, url, &filename).await;
    }

    /// Invoke the host's download primitive, surfacing a terminal failure
    async fn native_download(&self, session: SessionId, url: &str, filename: &str) {
        match self
            .native
            .download(url, Some(filename), ConflictPolicy::Uniquify)
            .await
        {
            Ok(()) => {
                tracing::debug!(url = %url, downloader = self.native.name(), "native download started");
            }
            Err(e) => {
                tracing::error!(url = %url, error = %e, "native download failed after interception");
                self.emit_event(Event::DownloadFailed {
                    session_id: session,
                    url: url.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }
}
