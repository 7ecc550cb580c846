//! Device operation facade
//!
//! [`Device`] is the only entry point SSH-agent and GPG-assuan servers use.
//! It composes the session registry, capability negotiation and identity
//! resolution, frames requests and routes every response through the
//! status translator.
//!
//! ```text
//! Disconnected --connect()--> Connecting --ok--> Connected
//!      ^                          |                  |
//!      +-------- failure ---------+                  |
//!      +------ close() / transport failure ----------+
//! ```
//!
//! There is no automatic reconnect inside `pubkey`/`sign`.

use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, error, warn};

use crate::config::DeviceConfig;
use crate::error::{AgentError, AgentResult, TransportError, UnsupportedError};
use crate::model::{DeviceInfo, Identity, OperationRequest, Protocol};
use crate::negotiation;
use crate::ports::Discovery;
use crate::resolver::IdentityResolver;
use crate::session::{Session, SessionRegistry};
use crate::translator;

/// Connection state of one facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Handle on one configured Solo token
pub struct Device<D: Discovery> {
    registry: Arc<SessionRegistry<D>>,
    resolver: IdentityResolver,
    config: DeviceConfig,
    session: Option<Arc<Session<D::Transport>>>,
    state: ConnectionState,
}

impl<D: Discovery> Device<D> {
    pub fn new(registry: Arc<SessionRegistry<D>>) -> Self {
        Self::with_config(registry, DeviceConfig::default())
    }

    pub fn with_config(registry: Arc<SessionRegistry<D>>, config: DeviceConfig) -> Self {
        Self {
            registry,
            resolver: IdentityResolver::default(),
            config,
            session: None,
            state: ConnectionState::Disconnected,
        }
    }

    /// Package that provides this backend
    pub fn package_name() -> &'static str {
        "solo-agent"
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn registry(&self) -> &Arc<SessionRegistry<D>> {
        &self.registry
    }

    /// Capabilities negotiated with the connected token
    pub fn info(&self) -> Option<&DeviceInfo> {
        self.session.as_ref().and_then(|session| session.info())
    }

    /// Find the token and check its firmware
    ///
    /// Reuses the current session while it is live, without negotiating
    /// again.
    ///
    /// # Errors
    ///
    /// - [`AgentError::NotFound`] if no token matches the selectors
    /// - [`AgentError::Configuration`] if the firmware lacks the agent
    ///   extension or a selector is invalid
    /// - [`AgentError::Transport`] if the capability query fails
    pub fn connect(&mut self) -> AgentResult<Arc<Session<D::Transport>>> {
        if let Some(session) = &self.session {
            if session.is_live() {
                return Ok(Arc::clone(session));
            }
            self.session = None;
        }

        self.state = ConnectionState::Connecting;
        match self.establish() {
            Ok(session) => {
                self.session = Some(Arc::clone(&session));
                self.state = ConnectionState::Connected;
                Ok(session)
            }
            Err(err) => {
                self.state = ConnectionState::Disconnected;
                Err(err)
            }
        }
    }

    fn establish(&self) -> AgentResult<Arc<Session<D::Transport>>> {
        let session = self
            .registry
            .find()?
            .ok_or_else(|| AgentError::NotFound {
                device: self.to_string(),
            })?;

        debug!(connection = session.describe(), "using connection");
        if let Err(err) = negotiation::negotiate(&session, &self.config) {
            self.registry.invalidate_if(&session);
            return Err(err);
        }
        Ok(session)
    }

    /// Drop this facade's session and clear it from the registry
    ///
    /// Other facades holding the same session see it as dead and reconnect
    /// through discovery.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            self.registry.invalidate_if(&session);
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Public key for `identity`, returned verbatim from the token
    pub fn pubkey(&mut self, identity: &dyn Identity, ecdh: bool) -> AgentResult<Vec<u8>> {
        self.resolver.verify_curve_support(identity)?;
        let curve = self.resolver.select_curve_name(identity, ecdh);
        debug!(
            identity = identity.label(),
            %curve,
            device = %self,
            "getting public key"
        );

        let public_key = self
            .call(OperationRequest::get_public_key())
            .inspect_err(|err| {
                if let AgentError::Status(status) = err {
                    warn!(identity = identity.label(), status = %status.code, "pubkey failed");
                }
            })?;
        debug!(public_key = %hex::encode(&public_key), "got public key");
        Ok(public_key)
    }

    /// Sign `blob` with the key for `identity`
    ///
    /// SSH challenges are hashed with SHA-256 here; every other protocol
    /// passes a blob its caller has already digested.
    pub fn sign(&mut self, identity: &dyn Identity, blob: &[u8]) -> AgentResult<Vec<u8>> {
        self.resolver.verify_curve_support(identity)?;
        debug!(
            identity = identity.label(),
            protocol = %identity.protocol(),
            blob_len = blob.len(),
            "sign requested"
        );

        let payload = signing_payload(identity, blob);
        self.call(OperationRequest::sign(payload))
            .inspect_err(|err| match err {
                AgentError::Status(status) => {
                    error!(identity = identity.label(), status = %status.code, "sign status");
                }
                other => error!(identity = identity.label(), error = %other, "sign failed"),
            })
    }

    /// Key agreement is not part of the Solo agent dialect
    pub fn ecdh(&mut self, identity: &dyn Identity, peer_pubkey: &[u8]) -> AgentResult<Vec<u8>> {
        self.resolver.verify_curve_support(identity)?;
        debug!(
            identity = identity.label(),
            peer_len = peer_pubkey.len(),
            "ecdh requested"
        );
        Err(UnsupportedError::Operation {
            operation: "ecdh".to_string(),
        }
        .into())
    }

    fn call(&mut self, request: OperationRequest) -> AgentResult<Vec<u8>> {
        let session = match &self.session {
            Some(session) if session.is_live() => Arc::clone(session),
            _ => {
                self.session = None;
                self.state = ConnectionState::Disconnected;
                return Err(AgentError::NotConnected);
            }
        };

        match session.exchange(&request.to_bytes(), self.config.deadline()) {
            Ok(response) => translator::translate(request.command, &response).map(<[u8]>::to_vec),
            Err(err) => {
                self.drop_session(&session, &err);
                Err(err.into())
            }
        }
    }

    fn drop_session(&mut self, session: &Arc<Session<D::Transport>>, err: &TransportError) {
        warn!(
            connection = session.describe(),
            error = %err,
            "transport failure, dropping session"
        );
        self.registry.invalidate_if(session);
        self.session = None;
        self.state = ConnectionState::Disconnected;
    }
}

impl<D: Discovery> fmt::Display for Device<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let serial = self
            .registry
            .selectors()
            .resolve()
            .ok()
            .and_then(|selector| selector.serial);
        match serial {
            Some(serial) => write!(f, "Solo({serial})"),
            None => f.write_str("Solo"),
        }
    }
}

impl<D: Discovery> fmt::Debug for Device<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("state", &self.state)
            .field(
                "connection",
                &self.session.as_ref().map(|session| session.describe()),
            )
            .field("config", &self.config)
            .finish()
    }
}

/// Bytes the token signs for `blob`
fn signing_payload(identity: &dyn Identity, blob: &[u8]) -> Vec<u8> {
    match identity.protocol() {
        Protocol::Ssh => Sha256::digest(blob).to_vec(),
        _ => blob.to_vec(),
    }
}
