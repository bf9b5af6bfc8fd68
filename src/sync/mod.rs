//! Sync layer
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ VersionSource│────▶│  Reconciler  │────▶│ ArtifactStore│
//! │  (IBM Cloud) │     │ (diff/update)│     │  (FsStore)   │
//! └──────────────┘     └──────┬───────┘     └──────────────┘
//!                             │
//!                    ┌────────┴────────┐
//!                    ▼                 ▼
//!             ┌────────────┐    ┌────────────┐
//!             │ Extractors │    │  Updaters  │
//!             └────────────┘    └────────────┘
//! ```
//!
//! # Modules
//!
//! - [`reconciler`]: FETCH → EXTRACT → DIFF → UPDATE → REPORT
//! - [`report`]: JSON reports for extract, update and sync
//! - [`storage`]: Artifact store trait and file system implementation
//! - [`error`]: Errors that abort a sync run

pub mod error;
pub mod reconciler;
pub mod report;
pub mod storage;

pub use error::SyncError;
pub use reconciler::{Reconciler, diff_versions};
pub use report::{ExtractReport, SyncReport, UpdateReport};
pub use storage::{ArtifactStore, FsStore};
