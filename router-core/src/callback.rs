//! Callback identifiers and the callback-data wire encoding.
//!
//! Callback payloads travel as a single comma-separated string: the
//! url-encoded identifier first, then `key=value` pairs with both sides
//! url-encoded. [`CallbackData`] builds that string; the router's callback
//! matcher consumes it.

use std::fmt;

/// The string token a callback route is registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackIdentifier(String);

impl CallbackIdentifier {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallbackIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallbackIdentifier {
    fn from(identifier: &str) -> Self {
        Self::new(identifier)
    }
}

/// A structured callback payload: identifier plus ordered key/value params.
///
/// ```
/// use router_core::CallbackData;
///
/// let data = CallbackData::new("act")
///     .with_param("a", "1")
///     .with_param("b", "x y");
/// assert_eq!(data.to_string(), "act,a=1,b=x%20y");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackData {
    identifier: String,
    params: Vec<(String, String)>,
}

impl CallbackData {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            params: Vec::new(),
        }
    }

    /// Appends one key/value pair; order is preserved in the encoding.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

impl fmt::Display for CallbackData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&urlencoding::encode(&self.identifier))?;
        for (key, value) in &self.params {
            write!(
                f,
                ",{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )?;
        }
        Ok(())
    }
}
