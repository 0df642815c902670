//! API credentials that never end up in logs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A credential string, zeroed on drop and redacted when formatted.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    inner: String,
}

impl SecretString {
    /// Wrap a credential.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Read a credential from the environment, ignoring empty values.
    pub fn from_env(name: &str) -> Option<Self> {
        crate::env::get_var(name).map(Self::new)
    }

    /// Expose the raw value. Only call this when building a request.
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }

    /// Check if the credential is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// A short hint for diagnostics, e.g. `sk-...wxyz`.
    ///
    /// Short credentials are fully masked.
    pub fn hint(&self) -> String {
        let chars: Vec<char> = self.inner.chars().collect();
        if chars.len() < 12 {
            return "*".repeat(chars.len().min(8));
        }
        let head: String = chars[..3].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for SecretString {}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Config files hold the real value.
        self.inner.serialize(serializer)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
