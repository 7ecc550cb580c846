//! Runtime configuration: device selectors and operation deadlines
//!
//! Selectors come from the environment and are re-read on every discovery
//! attempt, so exporting `SOLO_SERIAL` between two connects takes effect
//! without restarting the agent.

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::ConfigurationError;

/// Serial number of the token to use
pub const SERIAL_VAR: &str = "SOLO_SERIAL";
/// Talk to the UDP simulator instead of USB
pub const UDP_VAR: &str = "SOLO_UDP";

/// Which token discovery should accept
///
/// The default accepts any physical token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub serial: Option<String>,
    pub udp: bool,
}

impl Selector {
    pub fn serial(serial: impl Into<String>) -> Self {
        Self {
            serial: Some(serial.into()),
            udp: false,
        }
    }

    /// Read `SOLO_SERIAL` and `SOLO_UDP` from the process environment
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let serial = lookup(SERIAL_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let udp = match lookup(UDP_VAR) {
            Some(value) => parse_flag(UDP_VAR, &value)?,
            None => false,
        };
        Ok(Self { serial, udp })
    }

    /// Whether a token with the given serial number is acceptable
    pub fn matches_serial(&self, serial: Option<&str>) -> bool {
        match (&self.serial, serial) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
            (Some(_), None) => false,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.serial {
            Some(serial) => write!(f, "serial={serial}")?,
            None => f.write_str("serial=any")?,
        }
        write!(f, " udp={}", self.udp)
    }
}

fn parse_flag(variable: &str, value: &str) -> Result<bool, ConfigurationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigurationError::InvalidSelector {
            variable: variable.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Where the session registry gets its selector from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectorSource {
    /// Re-read the process environment on every discovery attempt
    #[default]
    Environment,
    Fixed(Selector),
}

impl SelectorSource {
    pub fn resolve(&self) -> Result<Selector, ConfigurationError> {
        match self {
            SelectorSource::Environment => Selector::from_env(),
            SelectorSource::Fixed(selector) => Ok(selector.clone()),
        }
    }
}

/// Per-device settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Upper bound for a single exchange, including waiting for a touch
    pub timeout: Duration,
}

impl DeviceConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn deadline(&self) -> Deadline {
        Deadline::after(self.timeout)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

/// Point in time by which an exchange must complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
    timeout: Duration,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
            timeout,
        }
    }

    /// Time left, or `None` once the deadline has passed
    pub fn remaining(&self) -> Option<Duration> {
        self.at
            .checked_duration_since(Instant::now())
            .filter(|left| !left.is_zero())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_none()
    }

    /// The timeout this deadline was created with
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
