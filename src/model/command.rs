//! Agent command bytes (`11` get public key, `13` sign) and request framing

use std::fmt;

/// One-byte command selector of the agent dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    GetPublicKey = 11,
    Sign = 13,
}

impl Command {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::GetPublicKey => f.write_str("get-public-key"),
            Command::Sign => f.write_str("sign"),
        }
    }
}

/// `[command byte][payload]`, built and consumed within one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub command: Command,
    pub payload: Vec<u8>,
}

impl OperationRequest {
    pub fn get_public_key() -> Self {
        Self {
            command: Command::GetPublicKey,
            payload: Vec::new(),
        }
    }

    pub fn sign(payload: Vec<u8>) -> Self {
        Self {
            command: Command::Sign,
            payload,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.payload.len());
        bytes.push(self.command.code());
        bytes.extend_from_slice(&self.payload);
        bytes
    }
}
