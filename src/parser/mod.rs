//! Parser layer
//! - traits.rs: Extractor trait and the shared artifact error
//! - types.rs: Common types (ArtifactKind, ServiceConfig)
//! - hcl.rs: variables.tf validation block extractor
//! - catalog.rs: ibm_catalog.json extractor
//! - go_test.rs: Go test source extractor

pub mod catalog;
pub mod hcl;
pub mod traits;
pub mod types;

pub use catalog::CatalogExtractor;
pub use go_test::GoTestExtractor;
pub use hcl::HclExtractor;
pub use traits::{ArtifactError, Extractor};
pub use types::{ArtifactKind, ServiceConfig};
