pub mod cli;
pub mod config;
pub mod logging;
pub mod parser;
pub mod sync;
pub mod updater;
pub mod version;
