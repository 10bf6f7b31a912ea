//! # xref-config
//!
//! Layered configuration with cross-source references, typed access and
//! prefix views.
//!
//! ## Overview
//!
//! A [`Config`](core::Config) owns a primary key-value store and a registry of
//! named reference sources. Any string value of the exact form
//! `${source:key}` is replaced, once and eagerly during construction, by the
//! value found under `key` in `source`, following chains of references until a
//! literal is reached. Two sources are always registered:
//!
//! - `this` - the primary store itself
//! - `env` - the process environment
//!
//! After construction, typed getters read the resolved store and
//! [`of`](core::Config::of) scopes a view to a dotted prefix without copying.
//!
//! Keys are case-insensitive and stored lowercased. A reference that lands on
//! a table has the references inside that table resolved too; array elements
//! are left as written.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xref_config::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct DatabaseConfig {
//!     url: String,
//!     password: String,
//! }
//!
//! # fn example() -> xref_config::error::Result<()> {
//! // config.yaml:
//! //   server:
//! //     readtimeout: 10s
//! //   database:
//! //     url: ${env:DATABASE_URL}
//! //     password: ${secrets:db.password}
//! let config = Config::builder()
//!     .with_file("config.yaml")
//!     .with_reference_file("secrets", "secrets.yaml")
//!     .build()?;
//!
//! let server = config.of("server");
//! let timeout = server.get_duration("readtimeout")?;
//!
//! match config.unmarshal::<DatabaseConfig>("database") {
//!     Ok(database) => println!("connecting to {}", database.url),
//!     Err(err) => eprintln!("database disabled: {err}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Wiring mistakes (unknown source, missing key, circular chain, a value that
//! cannot be cast) are [`ConfigError`](error::ConfigError)s meant to abort
//! startup. Decoding a subtree into a struct returns a separate
//! [`DecodeError`](error::DecodeError) the caller may handle.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod sources;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{Config, ConfigBuilder, FromValue, Reference, SourceRegistry};
    pub use crate::error::{ConfigError, DecodeError, Result};
    pub use crate::sources::{ConfigSource, EnvSource, FileSource, Store};
}
