//! Version layer
//!
//! Everything that deals with version identifiers independent of the file
//! they were read from.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐
//! │   Source    │────▶│   Compare   │
//! │ (IBM Cloud) │     │ (ordering)  │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`compare`]: Component-wise ordering, sorting and prose formatting
//! - [`source`]: Trait for fetching the authoritative version list
//! - [`sources`]: Concrete sources (IBM Cloud Databases API)
//! - [`error`]: Error types for source operations
//! - [`types`]: `VersionInfo` and `UpdateRequest`

pub mod compare;
pub mod error;
pub mod source;
pub mod sources;
pub mod types;
