//! Solo hardware token backend for SSH and GPG agents
//!
//! The agent protocol servers hold one [`Device`] per configured token and
//! call [`Device::connect`], then [`Device::pubkey`] or [`Device::sign`].
//! Private keys never leave the token; this crate only frames requests,
//! checks firmware capabilities and translates status codes.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use solo_agent::{Curve, Device, SessionRegistry, SshIdentity};
//! # fn demo<D: solo_agent::ports::Discovery>(discovery: D) -> solo_agent::AgentResult<()> {
//! let registry = Arc::new(SessionRegistry::new(discovery));
//! let mut device = Device::new(registry);
//! device.connect()?;
//!
//! let identity = SshIdentity::parse("ssh://git@github.com", Curve::NistP256)?;
//! let public_key = device.pubkey(&identity, false)?;
//! let signature = device.sign(&identity, b"challenge")?;
//! # Ok(())
//! # }
//! ```

mod adapters;
pub mod config;
pub mod device;
pub mod error;
pub mod model;
pub mod negotiation;
pub mod ports;
pub mod resolver;
pub mod session;
pub mod translator;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{DeviceConfig, Selector, SelectorSource};
pub use device::{ConnectionState, Device};
pub use error::{AgentError, AgentResult};
pub use model::{
    Command, Curve, DeviceInfo, GpgIdentity, Identity, IdentityUri, Protocol, SshIdentity,
    StatusCode,
};
pub use session::{Session, SessionRegistry};
