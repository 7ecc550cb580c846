//! Capability negotiation
//!
//! Firmware without the agent extension answers agent commands with
//! garbage or not at all, so it is rejected before the first command.

use tracing::debug;

use crate::config::DeviceConfig;
use crate::error::{AgentResult, ConfigurationError};
use crate::model::DeviceInfo;
use crate::ports::Transport;
use crate::session::Session;

/// Extension that identifies the agent command dialect
pub const REQUIRED_EXTENSION: &str = "solo-ssh-agent";

pub fn verify_extensions(info: &DeviceInfo) -> Result<(), ConfigurationError> {
    if info.supports_extension(REQUIRED_EXTENSION) {
        Ok(())
    } else {
        Err(ConfigurationError::MissingExtension {
            extension: REQUIRED_EXTENSION.to_string(),
        })
    }
}

/// Query and check the session's capabilities, once per session
///
/// A session that already passed negotiation is not queried again.
/// Concurrent callers on one session wait for the first query to finish.
pub fn negotiate<T: Transport>(
    session: &Session<T>,
    config: &DeviceConfig,
) -> AgentResult<DeviceInfo> {
    if let Some(info) = session.info() {
        return Ok(info.clone());
    }

    let _guard = session.lock_negotiation();
    if let Some(info) = session.info() {
        return Ok(info.clone());
    }

    let info = session.get_info(config.deadline())?;
    debug!(
        connection = session.describe(),
        versions = ?info.versions,
        extensions = ?info.extensions,
        "connected"
    );

    verify_extensions(&info)?;
    session.record_info(info.clone());
    Ok(info)
}
