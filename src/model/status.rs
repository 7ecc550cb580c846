//! Status byte returned as the first byte of every device response

use std::fmt;

/// Broad category of a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Success,
    /// The user can fix it by touching the token, entering a PIN, retrying
    UserRecoverable,
    /// The request was malformed; a bug on our side or a firmware mismatch
    Protocol,
    /// Anything else the token reports
    Device,
}

/// One-byte status code (CTAP2 numbering)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u8);

impl StatusCode {
    pub const SUCCESS: Self = Self(0x00);
    pub const INVALID_COMMAND: Self = Self(0x01);
    pub const INVALID_PARAMETER: Self = Self(0x02);
    pub const INVALID_LENGTH: Self = Self(0x03);
    pub const INVALID_SEQ: Self = Self(0x04);
    pub const TIMEOUT: Self = Self(0x05);
    pub const CHANNEL_BUSY: Self = Self(0x06);
    pub const LOCK_REQUIRED: Self = Self(0x0A);
    pub const INVALID_CHANNEL: Self = Self(0x0B);
    pub const INVALID_CBOR: Self = Self(0x12);
    pub const MISSING_PARAMETER: Self = Self(0x14);
    pub const UNSUPPORTED_EXTENSION: Self = Self(0x16);
    pub const INVALID_CREDENTIAL: Self = Self(0x22);
    pub const USER_ACTION_PENDING: Self = Self(0x23);
    pub const UNSUPPORTED_ALGORITHM: Self = Self(0x26);
    pub const OPERATION_DENIED: Self = Self(0x27);
    pub const KEY_STORE_FULL: Self = Self(0x28);
    pub const KEEPALIVE_CANCEL: Self = Self(0x2D);
    pub const NO_CREDENTIALS: Self = Self(0x2E);
    pub const USER_ACTION_TIMEOUT: Self = Self(0x2F);
    pub const NOT_ALLOWED: Self = Self(0x30);
    pub const PIN_INVALID: Self = Self(0x31);
    pub const PIN_BLOCKED: Self = Self(0x32);
    pub const PIN_AUTH_INVALID: Self = Self(0x33);
    pub const PIN_AUTH_BLOCKED: Self = Self(0x34);
    pub const PIN_NOT_SET: Self = Self(0x35);
    pub const PIN_REQUIRED: Self = Self(0x36);
    pub const REQUEST_TOO_LARGE: Self = Self(0x39);
    pub const ACTION_TIMEOUT: Self = Self(0x3A);
    pub const UP_REQUIRED: Self = Self(0x3B);
    pub const OTHER: Self = Self(0x7F);

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    pub fn class(self) -> StatusClass {
        match self {
            Self::SUCCESS => StatusClass::Success,
            Self::TIMEOUT
            | Self::CHANNEL_BUSY
            | Self::USER_ACTION_PENDING
            | Self::OPERATION_DENIED
            | Self::KEEPALIVE_CANCEL
            | Self::USER_ACTION_TIMEOUT
            | Self::PIN_INVALID
            | Self::PIN_AUTH_INVALID
            | Self::PIN_REQUIRED
            | Self::ACTION_TIMEOUT
            | Self::UP_REQUIRED => StatusClass::UserRecoverable,
            Self::INVALID_COMMAND
            | Self::INVALID_PARAMETER
            | Self::INVALID_LENGTH
            | Self::INVALID_SEQ
            | Self::INVALID_CHANNEL
            | Self::INVALID_CBOR
            | Self::MISSING_PARAMETER
            | Self::UNSUPPORTED_EXTENSION
            | Self::UNSUPPORTED_ALGORITHM
            | Self::REQUEST_TOO_LARGE => StatusClass::Protocol,
            _ => StatusClass::Device,
        }
    }

    /// Symbolic name, if the code is a known one
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::SUCCESS => "SUCCESS",
            Self::INVALID_COMMAND => "INVALID_COMMAND",
            Self::INVALID_PARAMETER => "INVALID_PARAMETER",
            Self::INVALID_LENGTH => "INVALID_LENGTH",
            Self::INVALID_SEQ => "INVALID_SEQ",
            Self::TIMEOUT => "TIMEOUT",
            Self::CHANNEL_BUSY => "CHANNEL_BUSY",
            Self::LOCK_REQUIRED => "LOCK_REQUIRED",
            Self::INVALID_CHANNEL => "INVALID_CHANNEL",
            Self::INVALID_CBOR => "INVALID_CBOR",
            Self::MISSING_PARAMETER => "MISSING_PARAMETER",
            Self::UNSUPPORTED_EXTENSION => "UNSUPPORTED_EXTENSION",
            Self::INVALID_CREDENTIAL => "INVALID_CREDENTIAL",
            Self::USER_ACTION_PENDING => "USER_ACTION_PENDING",
            Self::UNSUPPORTED_ALGORITHM => "UNSUPPORTED_ALGORITHM",
            Self::OPERATION_DENIED => "OPERATION_DENIED",
            Self::KEY_STORE_FULL => "KEY_STORE_FULL",
            Self::KEEPALIVE_CANCEL => "KEEPALIVE_CANCEL",
            Self::NO_CREDENTIALS => "NO_CREDENTIALS",
            Self::USER_ACTION_TIMEOUT => "USER_ACTION_TIMEOUT",
            Self::NOT_ALLOWED => "NOT_ALLOWED",
            Self::PIN_INVALID => "PIN_INVALID",
            Self::PIN_BLOCKED => "PIN_BLOCKED",
            Self::PIN_AUTH_INVALID => "PIN_AUTH_INVALID",
            Self::PIN_AUTH_BLOCKED => "PIN_AUTH_BLOCKED",
            Self::PIN_NOT_SET => "PIN_NOT_SET",
            Self::PIN_REQUIRED => "PIN_REQUIRED",
            Self::REQUEST_TOO_LARGE => "REQUEST_TOO_LARGE",
            Self::ACTION_TIMEOUT => "ACTION_TIMEOUT",
            Self::UP_REQUIRED => "UP_REQUIRED",
            Self::OTHER => "OTHER",
            _ => return None,
        };
        Some(name)
    }
}

impl From<u8> for StatusCode {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "0x{:02X} ({})", self.0, name),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusCode({self})")
    }
}
