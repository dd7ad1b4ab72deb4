//! # media-scout
//!
//! Media detection and download-routing core for browser-integrated download
//! applications.
//!
//! ## Design Philosophy
//!
//! media-scout is designed to be:
//! - **Host-agnostic** - network and UI events arrive as plain function calls,
//!   not host-specific hooks
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - consumers subscribe to events, no polling required
//! - **Never in the way** - classification failures degrade to negatives;
//!   nothing here may block a page's normal operation
//!
//! ## Quick Start
//!
//! ```no_run
//! use media_scout::{Config, MediaScout, Provenance, SessionId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scout = MediaScout::new(Config::default())?;
//!
//!     // Subscribe to events
//!     let mut events = scout.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     // Feed candidate URLs observed in a tab (fire-and-forget)
//!     let session = SessionId::new(1);
//!     scout.submit_candidate(session, "https://cdn.example.com/v.mp4", Provenance::Network);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// URL canonicalization for deduplication
pub mod canonical;
/// Semantic classification of probe metadata
pub mod classify;
/// Companion forwarding and the native-download seam
pub mod companion;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Filename derivation and sanitization
pub mod filename;
/// Companion liveness caching
pub mod liveness;
/// Single-flight header probing
pub mod probe;
/// Per-session registry of accepted items
pub mod registry;
/// Download interception decision logic
pub mod router;
/// Core scout implementation (decomposed into focused submodules)
pub mod scout;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use companion::{CompanionClient, NativeDownloader, NoOpNativeDownloader};
pub use config::{CanonicalizeConfig, CompanionConfig, Config, ProbeConfig};
pub use error::{Error, Result};
pub use probe::HeaderProbeCache;
pub use registry::SessionRegistry;
pub use scout::MediaScout;
pub use types::{
    ConflictPolicy, Event, MediaItem, Navigation, ProbeResult, Provenance, ResourceContext,
    ResponseHeaders, RoutingDecision, SessionId,
};
