//! Interpretation of the status byte that leads every device response
//!
//! Every operation routes its raw response through [`translate`]; none of
//! them inspect the status byte on their own.

use crate::error::{AgentResult, DeviceStatusError, TransportError};
use crate::model::{Command, StatusCode};

/// Split `[status][payload]` into the payload or a typed failure
///
/// # Errors
///
/// - [`DeviceStatusError`] carrying the raw code when the status is non-zero
/// - [`TransportError::MalformedResponse`] when the response is empty
pub fn translate(command: Command, response: &[u8]) -> AgentResult<&[u8]> {
    let (&status, payload) =
        response
            .split_first()
            .ok_or_else(|| TransportError::MalformedResponse {
                reason: format!("empty response to {command}"),
            })?;

    let code = StatusCode(status);
    if code.is_success() {
        Ok(payload)
    } else {
        Err(DeviceStatusError { command, code }.into())
    }
}
