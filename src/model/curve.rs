//! Elliptic curves an identity may ask for

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Curve {
    /// NIST P-256 (secp256r1)
    #[default]
    NistP256,
    Secp256k1,
    Ed25519,
    /// X25519 key agreement counterpart of Ed25519
    Curve25519,
}

impl Curve {
    pub fn as_str(self) -> &'static str {
        match self {
            Curve::NistP256 => "nist256p1",
            Curve::Secp256k1 => "secp256k1",
            Curve::Ed25519 => "ed25519",
            Curve::Curve25519 => "curve25519",
        }
    }

    /// Curve used for key agreement under the same label
    ///
    /// Ed25519 keys agree over Curve25519; Weierstrass curves use themselves.
    pub fn ecdh_variant(self) -> Self {
        match self {
            Curve::Ed25519 => Curve::Curve25519,
            other => other,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Curve {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nist256p1" | "nistp256" | "p256" | "secp256r1" | "prime256v1" => Ok(Curve::NistP256),
            "secp256k1" => Ok(Curve::Secp256k1),
            "ed25519" => Ok(Curve::Ed25519),
            "curve25519" | "x25519" => Ok(Curve::Curve25519),
            _ => Err(CurveError::Unknown {
                curve: s.to_string(),
            }),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("Unknown elliptic curve: {curve}")]
    Unknown { curve: String },
}
