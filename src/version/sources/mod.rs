//! Concrete version source implementations

pub mod ibm_cloud;

pub use ibm_cloud::{IbmCloudSource, TokenLease, resolve_api_key};
