#![allow(dead_code)]

mod repo;
mod source;

pub use repo::*;
pub use source::*;
