//! Transport trait - capability to exchange raw agent commands with a token

use crate::config::Deadline;
use crate::error::TransportError;
use crate::model::DeviceInfo;

/// An open connection to one physical (or simulated) token
///
/// Implementations own the handle and whatever framing the bus needs. To
/// this crate a request is `[command][payload]` and a response is
/// `[status][payload]`; both are opaque byte strings.
pub trait Transport: Send {
    /// Short description of the connection for log lines
    fn describe(&self) -> String;

    /// Query the firmware's version and extension set
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the token does not answer before
    /// `deadline` or the answer cannot be decoded.
    fn get_info(&mut self, deadline: Deadline) -> Result<DeviceInfo, TransportError>;

    /// Send one framed agent request and return the raw response
    ///
    /// The response is returned verbatim, status byte included.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Timeout`] once `deadline` passes and
    /// [`TransportError::Io`] if the connection breaks.
    fn exchange(&mut self, request: &[u8], deadline: Deadline) -> Result<Vec<u8>, TransportError>;
}
