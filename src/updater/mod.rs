//! Updater layer
//! - traits.rs: Updater trait
//! - scan.rs: Brace counting and whitespace helpers for line scans
//! - hcl.rs: variables.tf comparison list and error message
//! - catalog.rs: ibm_catalog.json default value and options
//! - go_test.rs: Go test version pin

pub mod catalog;
pub mod hcl;
pub(crate) mod scan;
pub mod traits;

pub use catalog::CatalogUpdater;
pub use go_test::GoTestUpdater;
pub use hcl::{HclUpdater, version_error_message};
pub use traits::Updater;
