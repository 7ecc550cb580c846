//! Identity resolution: reject identities this backend cannot serve
//!
//! All checks here are pure and run before any device I/O.

use std::collections::BTreeSet;

use crate::error::UnsupportedError;
use crate::model::{Curve, Identity};

/// Curves the Solo agent firmware can derive keys on
pub const SOLO_CURVES: &[Curve] = &[Curve::NistP256];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityResolver {
    supported: BTreeSet<Curve>,
}

impl IdentityResolver {
    pub fn new(supported: &[Curve]) -> Self {
        Self {
            supported: supported.iter().copied().collect(),
        }
    }

    pub fn supports(&self, curve: Curve) -> bool {
        self.supported.contains(&curve)
    }

    /// Fail fast if `identity` asks for a curve outside the supported set
    pub fn verify_curve_support(&self, identity: &dyn Identity) -> Result<(), UnsupportedError> {
        let curve = identity.curve_name();
        if self.supports(curve) {
            Ok(())
        } else {
            Err(UnsupportedError::Curve {
                curve: curve.to_string(),
            })
        }
    }

    pub fn select_curve_name(&self, identity: &dyn Identity, ecdh: bool) -> Curve {
        identity.select_curve_name(ecdh)
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(SOLO_CURVES)
    }
}
