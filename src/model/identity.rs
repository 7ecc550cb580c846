//! Identities: which key, on which curve, for which protocol
//!
//! Upstream protocol servers build an identity from a key comment or URI and
//! hand it to the device facade. The facade only ever sees the [`Identity`]
//! trait, so SSH and GPG flavours travel through the same call surface.

use std::fmt;

use thiserror::Error;

use super::{Curve, Protocol};

/// Logical key use-case resolved per call
pub trait Identity {
    /// Curve the key was created on
    fn curve_name(&self) -> Curve;

    /// Curve to request from the device
    ///
    /// With `ecdh` set, this is the key-agreement variant of [`Self::curve_name`].
    fn select_curve_name(&self, ecdh: bool) -> Curve {
        if ecdh {
            self.curve_name().ecdh_variant()
        } else {
            self.curve_name()
        }
    }

    fn protocol(&self) -> Protocol;

    /// Human readable label, stable across calls
    fn label(&self) -> &str;
}

/// `[proto://][user@]host[:port][/path]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityUri {
    pub protocol: Option<String>,
    pub user: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub path: Option<String>,
}

impl IdentityUri {
    pub fn parse(input: &str) -> Result<Self, IdentityError> {
        let input = input.trim();
        let (protocol, rest) = match input.split_once("://") {
            Some((scheme, rest)) if !scheme.is_empty() => (Some(scheme.to_string()), rest),
            Some(_) => {
                return Err(IdentityError::Malformed {
                    input: input.to_string(),
                })
            }
            None => (None, input),
        };

        let (authority, path) = match rest.split_once('/') {
            Some((authority, path)) => (authority, Some(path.to_string())),
            None => (rest, None),
        };

        let (user, host_port) = match authority.rsplit_once('@') {
            Some((user, host_port)) => (Some(user.to_string()), host_port),
            None => (None, authority),
        };

        let (host, port) = match host_port.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| IdentityError::InvalidPort {
                    port: port.to_string(),
                })?;
                (host, Some(port))
            }
            None => (host_port, None),
        };

        if host.is_empty() {
            return Err(IdentityError::MissingHost {
                input: input.to_string(),
            });
        }

        Ok(Self {
            protocol,
            user,
            host: host.to_string(),
            port,
            path: path.filter(|p| !p.is_empty()),
        })
    }
}

impl fmt::Display for IdentityUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(protocol) = &self.protocol {
            write!(f, "{protocol}://")?;
        }
        if let Some(user) = &self.user {
            write!(f, "{user}@")?;
        }
        f.write_str(&self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        if let Some(path) = &self.path {
            write!(f, "/{path}")?;
        }
        Ok(())
    }
}

/// Identity used for SSH authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshIdentity {
    uri: IdentityUri,
    curve: Curve,
    label: String,
}

impl SshIdentity {
    pub fn new(uri: IdentityUri, curve: Curve) -> Self {
        let label = uri.to_string();
        Self { uri, curve, label }
    }

    /// Parse a key comment such as `ssh://git@github.com`
    pub fn parse(comment: &str, curve: Curve) -> Result<Self, IdentityError> {
        Ok(Self::new(IdentityUri::parse(comment)?, curve))
    }

    pub fn uri(&self) -> &IdentityUri {
        &self.uri
    }
}

impl Identity for SshIdentity {
    fn curve_name(&self) -> Curve {
        self.curve
    }

    /// Always SSH; the comment's scheme only names the key
    fn protocol(&self) -> Protocol {
        Protocol::Ssh
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Identity used for GPG signing or decryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpgIdentity {
    user_id: String,
    curve: Curve,
    ecdh: bool,
}

impl GpgIdentity {
    pub fn new(user_id: impl Into<String>, curve: Curve) -> Self {
        Self {
            user_id: user_id.into(),
            curve,
            ecdh: false,
        }
    }

    /// The encryption subkey for the same user id
    pub fn for_ecdh(mut self) -> Self {
        self.ecdh = true;
        self
    }

    pub fn is_ecdh(&self) -> bool {
        self.ecdh
    }
}

impl Identity for GpgIdentity {
    fn curve_name(&self) -> Curve {
        self.curve
    }

    fn select_curve_name(&self, ecdh: bool) -> Curve {
        if ecdh || self.ecdh {
            self.curve.ecdh_variant()
        } else {
            self.curve
        }
    }

    fn protocol(&self) -> Protocol {
        Protocol::Gpg
    }

    fn label(&self) -> &str {
        &self.user_id
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Malformed identity: {input:?}")]
    Malformed { input: String },

    #[error("Identity has no host: {input:?}")]
    MissingHost { input: String },

    #[error("Invalid port in identity: {port:?}")]
    InvalidPort { port: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_uri() {
        let uri = IdentityUri::parse("ssh://git@github.com:2222/repo").unwrap();
        assert_eq!(uri.protocol.as_deref(), Some("ssh"));
        assert_eq!(uri.user.as_deref(), Some("git"));
        assert_eq!(uri.host, "github.com");
        assert_eq!(uri.port, Some(2222));
        assert_eq!(uri.path.as_deref(), Some("repo"));
        assert_eq!(uri.to_string(), "ssh://git@github.com:2222/repo");
    }

    #[test]
    fn test_parse_bare_host() {
        let uri = IdentityUri::parse("example.com").unwrap();
        assert_eq!(uri.protocol, None);
        assert_eq!(uri.user, None);
        assert_eq!(uri.host, "example.com");
        assert_eq!(uri.to_string(), "example.com");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            IdentityUri::parse("ssh://user@"),
            Err(IdentityError::MissingHost { .. })
        ));
        assert!(matches!(
            IdentityUri::parse("host:notaport"),
            Err(IdentityError::InvalidPort { .. })
        ));
        assert!(matches!(
            IdentityUri::parse("://host"),
            Err(IdentityError::Malformed { .. })
        ));
    }

    #[test]
    fn test_ssh_identity_protocol_ignores_scheme() {
        let identity = SshIdentity::parse("git@github.com", Curve::NistP256).unwrap();
        assert_eq!(identity.protocol(), Protocol::Ssh);
        assert_eq!(identity.label(), "git@github.com");

        let identity = SshIdentity::parse("https://example.com", Curve::NistP256).unwrap();
        assert_eq!(identity.protocol(), Protocol::Ssh);
        assert_eq!(identity.uri().protocol.as_deref(), Some("https"));
        assert_eq!(identity.label(), "https://example.com");
    }

    #[test]
    fn test_select_curve_name() {
        let ssh = SshIdentity::parse("ssh://host", Curve::Ed25519).unwrap();
        assert_eq!(ssh.select_curve_name(false), Curve::Ed25519);
        assert_eq!(ssh.select_curve_name(true), Curve::Curve25519);

        let gpg = GpgIdentity::new("Alice <alice@example.com>", Curve::Ed25519).for_ecdh();
        assert!(gpg.is_ecdh());
        assert_eq!(gpg.select_curve_name(false), Curve::Curve25519);
        assert_eq!(gpg.protocol(), Protocol::Gpg);
    }
}
