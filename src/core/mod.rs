//! Core configuration types: the resolved handle, its builder, and the
//! reference resolution machinery.

mod builder;
mod cast;
mod config_handle;
mod reference;
mod registry;
mod resolver;

pub use builder::ConfigBuilder;
pub use cast::FromValue;
pub use config_handle::Config;
pub use reference::Reference;
pub use registry::SourceRegistry;
