//! Error types for xref-config.
//!
//! Errors come in two tiers. [`ConfigError`] covers wiring mistakes: a
//! reference to an unknown source, a missing key, a value that cannot be cast,
//! a file that cannot be loaded. These are meant to stop the program during
//! startup. [`DecodeError`] is only produced by [`Config::unmarshal`] and is
//! left to the caller to handle.
//!
//! [`Config::unmarshal`]: crate::core::Config::unmarshal

/// Result type alias for xref-config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Fatal configuration errors raised during construction, resolution and
/// typed access.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A reference names a source that is not registered.
    #[error("no reference source registered under '{source_name}' (referenced by '{key}')")]
    SourceNotFound {
        /// Name used in the reference token
        source_name: String,
        /// Key holding the reference
        key: String,
    },

    /// A reference names a registered source that has no value for the key.
    #[error("key '{key}' not found in referenced source '{source_name}'")]
    ReferenceKeyNotFound {
        /// Source the lookup was made against
        source_name: String,
        /// Key that was looked up
        key: String,
    },

    /// A chain of references loops back onto itself.
    #[error("circular reference detected: {}", .chain.join(" -> "))]
    CircularReference {
        /// Every `source:key` hop visited, ending with the repeated one
        chain: Vec<String>,
    },

    /// A typed or untyped get found nothing at the key.
    #[error("key not found in config: {0}")]
    KeyNotFound(String),

    /// The value at a key cannot be converted into the requested type.
    #[error("cannot cast value at '{key}' to {target}: {reason}")]
    Cast {
        /// Fully prefixed key
        key: String,
        /// Requested type
        target: &'static str,
        /// Why the conversion failed
        reason: String,
    },

    /// Failed to load a store from an external location.
    #[error("Failed to load configuration: {0}")]
    LoadError(String),
}

/// Recoverable error returned when a subtree cannot be decoded into a
/// structured type.
#[derive(Debug, thiserror::Error)]
#[error("Failed to decode '{key}': {message}")]
pub struct DecodeError {
    key: String,
    message: String,
}

impl DecodeError {
    pub(crate) fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }

    /// The fully prefixed key that was being decoded.
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_reference_message() {
        let err = ConfigError::CircularReference {
            chain: vec!["this:a".into(), "x:b".into(), "this:a".into()],
        };
        assert_eq!(
            err.to_string(),
            "circular reference detected: this:a -> x:b -> this:a"
        );
    }

    #[test]
    fn test_source_not_found_names_both_sides() {
        let err = ConfigError::SourceNotFound {
            source_name: "secrets".into(),
            key: "db.password".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("secrets"));
        assert!(msg.contains("db.password"));
    }

    #[test]
    fn test_decode_error_key() {
        let err = DecodeError::new("server", "missing field `port`");
        assert_eq!(err.key(), "server");
        assert!(err.to_string().contains("missing field"));
    }
}
