//! Upstream protocols that identities belong to

use std::fmt;

/// Upstream protocol an identity is used with
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Protocol {
    Ssh,
    Gpg,
    /// Identities of other callers, signed without pre-hashing
    Other(String),
}

impl Protocol {
    pub fn from_scheme(scheme: &str) -> Self {
        match scheme.to_ascii_lowercase().as_str() {
            "ssh" => Protocol::Ssh,
            "gpg" => Protocol::Gpg,
            other => Protocol::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Ssh => "ssh",
            Protocol::Gpg => "gpg",
            Protocol::Other(scheme) => scheme,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
