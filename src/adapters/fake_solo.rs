//! In-memory Solo token for tests
//!
//! Clones of a [`FakeSolo`] share one call log, so a test can keep a handle
//! while the session layer owns the transport.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::config::{Deadline, Selector};
use crate::error::TransportError;
use crate::model::{Command, DeviceInfo, StatusCode};
use crate::negotiation::REQUIRED_EXTENSION;
use crate::ports::{Discovered, Discovery, Transport};

#[derive(Debug, Default)]
pub struct FakeCalls {
    pub get_info: usize,
    pub exchanges: Vec<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct FakeSolo {
    pub serial: Option<String>,
    pub info: DeviceInfo,
    pub public_key: Vec<u8>,
    /// Raw responses that replace the default behaviour, keyed by command byte
    pub scripted: HashMap<u8, Vec<u8>>,
    /// Every exchange fails with an I/O error
    pub broken: bool,
    /// How long the capability query takes to answer
    pub info_delay: Duration,
    calls: Arc<Mutex<FakeCalls>>,
}

impl FakeSolo {
    pub fn new() -> Self {
        let mut public_key = vec![0x04];
        public_key.extend((1..=64).map(|b| b as u8));
        Self {
            serial: Some("2050A1B2C3".to_string()),
            info: DeviceInfo::new(
                vec!["FIDO_2_0".to_string(), "U2F_V2".to_string()],
                ["hmac-secret", REQUIRED_EXTENSION],
            ),
            public_key,
            scripted: HashMap::new(),
            broken: false,
            info_delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(FakeCalls::default())),
        }
    }

    pub fn with_serial(mut self, serial: &str) -> Self {
        self.serial = Some(serial.to_string());
        self
    }

    /// Firmware that predates the agent extension
    pub fn without_agent_extension(mut self) -> Self {
        self.info.extensions.remove(REQUIRED_EXTENSION);
        self
    }

    pub fn respond_with(mut self, command: Command, response: Vec<u8>) -> Self {
        self.scripted.insert(command.code(), response);
        self
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    pub fn with_info_delay(mut self, delay: Duration) -> Self {
        self.info_delay = delay;
        self
    }

    pub fn get_info_calls(&self) -> usize {
        self.calls.lock().get_info
    }

    pub fn exchanges(&self) -> Vec<Vec<u8>> {
        self.calls.lock().exchanges.clone()
    }

    /// Number of requests that reached the token
    pub fn io_count(&self) -> usize {
        let calls = self.calls.lock();
        calls.get_info + calls.exchanges.len()
    }

    /// What the fake returns for a sign request over `payload`
    pub fn signature_for(payload: &[u8]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(b"fake-solo-signature");
        hasher.update(payload);
        hasher.finalize().to_vec()
    }
}

impl Transport for FakeSolo {
    fn describe(&self) -> String {
        format!("FakeSolo(serial={:?})", self.serial)
    }

    fn get_info(&mut self, deadline: Deadline) -> Result<DeviceInfo, TransportError> {
        if deadline.is_expired() {
            return Err(TransportError::Timeout {
                timeout: deadline.timeout(),
            });
        }
        self.calls.lock().get_info += 1;
        if !self.info_delay.is_zero() {
            std::thread::sleep(self.info_delay);
        }
        if self.broken {
            return Err(TransportError::Io {
                device: self.describe(),
                reason: "device unplugged".to_string(),
            });
        }
        Ok(self.info.clone())
    }

    fn exchange(&mut self, request: &[u8], deadline: Deadline) -> Result<Vec<u8>, TransportError> {
        if deadline.is_expired() {
            return Err(TransportError::Timeout {
                timeout: deadline.timeout(),
            });
        }
        self.calls.lock().exchanges.push(request.to_vec());
        if self.broken {
            return Err(TransportError::Io {
                device: self.describe(),
                reason: "device unplugged".to_string(),
            });
        }

        let Some((&command, payload)) = request.split_first() else {
            return Ok(vec![StatusCode::INVALID_LENGTH.0]);
        };
        if let Some(response) = self.scripted.get(&command) {
            return Ok(response.clone());
        }

        let mut response = vec![StatusCode::SUCCESS.0];
        if command == Command::GetPublicKey.code() {
            response.extend_from_slice(&self.public_key);
        } else if command == Command::Sign.code() {
            response.extend(Self::signature_for(payload));
        } else {
            return Ok(vec![StatusCode::INVALID_COMMAND.0]);
        }
        Ok(response)
    }
}

#[derive(Debug, Default)]
pub struct FakeDiscovery {
    pub devices: Vec<FakeSolo>,
    /// Tokens reachable only through the UDP simulator
    pub udp_devices: Vec<FakeSolo>,
    /// Enumeration fails with this reason
    pub failure: Option<String>,
    discoveries: AtomicUsize,
}

impl FakeDiscovery {
    pub fn new(devices: Vec<FakeSolo>) -> Self {
        Self {
            devices,
            ..Self::default()
        }
    }

    pub fn single(device: FakeSolo) -> Self {
        Self::new(vec![device])
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn discoveries(&self) -> usize {
        self.discoveries.load(Ordering::SeqCst)
    }
}

impl Discovery for FakeDiscovery {
    type Transport = FakeSolo;

    fn discover(&self, selector: &Selector) -> Discovered<Self::Transport> {
        self.discoveries.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = &self.failure {
            return Discovered::Failed(TransportError::Enumeration {
                reason: reason.clone(),
            });
        }

        let pool = if selector.udp {
            &self.udp_devices
        } else {
            &self.devices
        };
        pool.iter()
            .find(|device| selector.matches_serial(device.serial.as_deref()))
            .cloned()
            .map(Discovered::Found)
            .unwrap_or(Discovered::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract_tests_for;
    use crate::ports::contract_tests::transport_contract;

    contract_tests_for!(
        fake_solo_contract,
        make = FakeSolo::new,
        tests = {
            test_get_info_success => transport_contract::test_get_info_success,
            test_get_public_key_success => transport_contract::test_get_public_key_success,
            test_sign_success => transport_contract::test_sign_success,
            test_unknown_command_rejected => transport_contract::test_unknown_command_rejected,
            test_expired_deadline => transport_contract::test_expired_deadline,
        }
    );

    #[test]
    fn test_discovery_honours_serial() {
        let discovery = FakeDiscovery::new(vec![
            FakeSolo::new().with_serial("AAAA"),
            FakeSolo::new().with_serial("BBBB"),
        ]);

        match discovery.discover(&Selector::serial("bbbb")) {
            Discovered::Found(device) => assert_eq!(device.serial.as_deref(), Some("BBBB")),
            other => panic!("expected a device: {other:?}"),
        }
        assert!(matches!(
            discovery.discover(&Selector::serial("CCCC")),
            Discovered::NotFound
        ));
        assert_eq!(discovery.discoveries(), 2);
    }

    #[test]
    fn test_discovery_udp_pool() {
        let discovery = FakeDiscovery {
            udp_devices: vec![FakeSolo::new().with_serial("SIM")],
            ..FakeDiscovery::default()
        };
        let udp = Selector {
            serial: None,
            udp: true,
        };

        assert!(discovery.discover(&udp).is_found());
        assert!(!discovery.discover(&Selector::default()).is_found());
    }
}
