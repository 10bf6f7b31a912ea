//! Configuration source implementations.

mod config_source;
mod env;
mod file;
mod store;

pub use config_source::ConfigSource;
pub use env::EnvSource;
pub use file::FileSource;
pub use store::{SharedStore, Store};
