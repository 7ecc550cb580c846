//! Error types for solo-agent
//!
//! This module defines the error hierarchy for every device operation.
//! Upstream protocol servers (SSH agent, GPG assuan) match on these variants
//! to pick their own wire-level error replies.

use std::time::Duration;

use thiserror::Error;

use crate::model::{Command, IdentityError, StatusClass, StatusCode};

/// Result type alias for solo-agent operations
///
/// This is a convenience alias for `Result<T, AgentError>`.
pub type AgentResult<T> = Result<T, AgentError>;

/// Top-level error type for all device operations
#[derive(Error, Debug)]
pub enum AgentError {
    /// No matching token was discovered at connect time
    #[error("{device} not connected")]
    NotFound { device: String },

    /// `pubkey`/`sign` was called without an established session
    #[error("device is not connected - call connect() first")]
    NotConnected,

    /// The token or its environment is misconfigured
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The requested identity or operation cannot be served by this backend
    #[error("Unsupported configuration: {0}")]
    Unsupported(#[from] UnsupportedError),

    /// The token answered with a non-zero status byte
    #[error("Device error: {0}")]
    Status(#[from] DeviceStatusError),

    /// The exchange with the token itself failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A key comment or URI could not be turned into an identity
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),
}

impl AgentError {
    /// Whether repeating the same call may succeed
    ///
    /// Transport hiccups and user-recoverable statuses (touch timeout, wrong
    /// PIN) qualify. Configuration and validation failures never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            AgentError::Transport(_) => true,
            AgentError::Status(err) => err.code.class() == StatusClass::UserRecoverable,
            AgentError::NotFound { .. }
            | AgentError::NotConnected
            | AgentError::Configuration(_)
            | AgentError::Unsupported(_)
            | AgentError::Identity(_) => false,
        }
    }

    /// Raw device status code, if this error came from the token
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            AgentError::Status(err) => Some(err.code),
            _ => None,
        }
    }
}

/// Configuration-class errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Firmware does not advertise the extension the agent command set needs
    #[error("Please upgrade your firmware to a version that supports the {extension} extension")]
    MissingExtension { extension: String },

    /// An environment selector holds a value that cannot be interpreted
    #[error("Invalid value for {variable}: {value:?}")]
    InvalidSelector { variable: String, value: String },
}

/// Requests rejected before any device I/O
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedError {
    /// Elliptic curve outside the backend's supported set
    #[error("Unsupported elliptic curve: {curve}")]
    Curve { curve: String },

    /// Operation the backend does not implement
    #[error("Unsupported operation: {operation}")]
    Operation { operation: String },
}

/// Non-zero status returned by the token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{command} failed with status {code}")]
pub struct DeviceStatusError {
    pub command: Command,
    pub code: StatusCode,
}

/// Failures of the underlying exchange
#[derive(Error, Debug)]
pub enum TransportError {
    /// I/O with the token failed
    #[error("I/O failure talking to {device}: {reason}")]
    Io { device: String, reason: String },

    /// The deadline elapsed before the token answered
    #[error("no response within {timeout:?}")]
    Timeout { timeout: Duration },

    /// The token answered with something that cannot be a response
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// Device enumeration failed
    #[error("device enumeration failed: {reason}")]
    Enumeration { reason: String },
}
