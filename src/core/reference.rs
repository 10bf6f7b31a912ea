//! Reference token grammar.
//!
//! A reference is a string value of the exact form `${source:key}`. The source
//! name may contain `A-Z a-z 0-9 - _`, the key additionally `.`. Anything else,
//! including a reference embedded in a longer string, is a literal.

use config::{Value, ValueKind};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$\{([A-Za-z0-9\-_]*):([A-Za-z0-9\-_.]*)\}$")
        .expect("reference pattern is a valid regex")
});

/// A parsed `${source:key}` token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    source: String,
    key: String,
}

impl Reference {
    /// Create a reference to `key` in the source registered as `source`.
    pub fn new(source: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            key: key.into(),
        }
    }

    /// Parse a configuration value. Non-string values are never references.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use config::Value;
    /// use xref_config::core::Reference;
    ///
    /// let value = Value::from("${vault:db.password}");
    /// let reference = Reference::parse(&value).unwrap();
    /// assert_eq!(reference.source(), "vault");
    /// assert_eq!(reference.key(), "db.password");
    ///
    /// assert!(Reference::parse(&Value::from(42)).is_none());
    /// ```
    pub fn parse(value: &Value) -> Option<Self> {
        match &value.kind {
            ValueKind::String(s) => Self::parse_str(s),
            _ => None,
        }
    }

    /// Parse a raw string.
    pub fn parse_str(s: &str) -> Option<Self> {
        let captures = REFERENCE_PATTERN.captures(s)?;
        Some(Self::new(&captures[1], &captures[2]))
    }

    /// Name of the source the reference points into.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Key looked up in that source.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}:{}}}", self.source, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let reference = Reference::parse_str("${other:b}").unwrap();
        assert_eq!(reference, Reference::new("other", "b"));
    }

    #[test]
    fn test_parse_dotted_key_and_symbols() {
        let reference = Reference::parse_str("${my-source_1:db.primary-host_2}").unwrap();
        assert_eq!(reference.source(), "my-source_1");
        assert_eq!(reference.key(), "db.primary-host_2");
    }

    #[test]
    fn test_parse_empty_parts() {
        let reference = Reference::parse_str("${:}").unwrap();
        assert_eq!(reference.source(), "");
        assert_eq!(reference.key(), "");
    }

    #[test]
    fn test_dot_not_allowed_in_source() {
        assert!(Reference::parse_str("${a.b:c}").is_none());
    }

    #[test]
    fn test_embedded_reference_is_literal() {
        assert!(Reference::parse_str("prefix ${other:b}").is_none());
        assert!(Reference::parse_str("${other:b} suffix").is_none());
        assert!(Reference::parse_str("${a:b}${c:d}").is_none());
    }

    #[test]
    fn test_malformed_is_literal() {
        for literal in ["${}", "${other}", "$other:b}", "{other:b}", "${other:b c}", "plain"] {
            assert!(Reference::parse_str(literal).is_none(), "{literal}");
        }
    }

    #[test]
    fn test_non_string_values() {
        assert!(Reference::parse(&Value::from(1)).is_none());
        assert!(Reference::parse(&Value::from(true)).is_none());
        assert!(Reference::parse(&Value::from(vec!["${a:b}"])).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Reference::new("env", "HOME").to_string(), "${env:HOME}");
    }
}
