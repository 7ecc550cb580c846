//! Ports (traits) at the device boundary
//!
//! The session and facade layers depend on these abstractions only. The
//! concrete USB/HID or UDP transport lives behind them, together with its
//! own framing and channel handling.

mod discovery;
mod transport;

pub use discovery::{Discovered, Discovery};
pub use transport::Transport;
