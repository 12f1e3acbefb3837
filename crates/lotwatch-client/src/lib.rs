//! Polling client for the Lotwatch sync service.
//!
//! A [`Synchronizer`] keeps a count-only mirror of every catalog lot. It
//! fetches `GET /api/lots` once at startup and then on a fixed period. When
//! a fetch fails the mirror switches to synthetic counts drawn from each
//! lot's busy range, so recommendations keep working while the service is
//! down; the source label says which mode is active.
//!
//! # Architecture
//!
//! ```text
//! HttpFeed --> Synchronizer --watch<Arc<MirrorSnapshot>>--> readers
//!                   |
//!                   +--> present() --> PresentationRecord list
//! ```

pub mod error;
pub mod feed;
pub mod presentation;
pub mod sync;

pub use error::ClientError;
pub use feed::{HttpFeed, LotFeed};
pub use presentation::{PresentationRecord, format_source_label, present};
pub use sync::{RefreshOutcome, SyncHandle, Synchronizer, start};
