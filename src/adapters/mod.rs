//! Adapters - concrete implementations of ports (traits)
//!
//! Real USB/HID and UDP transports are provided by the embedding agent; the
//! fakes here stand in for a token in tests.

#[cfg(test)]
pub mod fake_solo;
