//! Client configuration
//!
//! The timing values were tuned against real controllers: the controller
//! drops commands arriving less than ~100ms apart, and a zone info reply
//! normally shows up well within one second.

use std::time::Duration;

use rnet_core::constants::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_DRAIN_ATTEMPTS, DEFAULT_KEYPAD, DEFAULT_MIN_DELAY_MS,
    DEFAULT_MIN_TRAILING, DEFAULT_POLL_DELAY_MS, DEFAULT_READ_ATTEMPTS,
};

/// Tunables for one client session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Sender keypad id written into every message
    pub keypad: u8,

    /// Minimum spacing between transmissions, also waited after each send
    pub min_delay: Duration,

    /// Sleep after each read attempt
    pub poll_delay: Duration,

    /// Read attempts when waiting for a reply
    pub read_attempts: usize,

    /// Read attempts when draining after a fire-and-forget command
    pub drain_attempts: usize,

    /// Bytes a candidate reply needs before it may match
    pub min_trailing: usize,

    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Config {
    pub fn with_keypad(mut self, keypad: u8) -> Self {
        self.keypad = keypad;
        self
    }

    pub fn with_min_delay(mut self, delay: Duration) -> Self {
        self.min_delay = delay;
        self
    }

    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    pub fn with_read_attempts(mut self, attempts: usize) -> Self {
        self.read_attempts = attempts;
        self
    }

    pub fn with_drain_attempts(mut self, attempts: usize) -> Self {
        self.drain_attempts = attempts;
        self
    }

    pub fn with_min_trailing(mut self, bytes: usize) -> Self {
        self.min_trailing = bytes;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Longest a single exchange can keep the session lock
    ///
    /// The post-send wait is `min_delay`, so the next send never throttles.
    pub fn worst_case_exchange(&self, expects_response: bool) -> Duration {
        let attempts = if expects_response {
            self.read_attempts
        } else {
            self.drain_attempts
        };
        let sleeps = u32::try_from(attempts.saturating_sub(1)).unwrap_or(u32::MAX);
        self.min_delay.saturating_add(self.poll_delay.saturating_mul(sleeps))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keypad: DEFAULT_KEYPAD,
            min_delay: Duration::from_millis(DEFAULT_MIN_DELAY_MS),
            poll_delay: Duration::from_millis(DEFAULT_POLL_DELAY_MS),
            read_attempts: DEFAULT_READ_ATTEMPTS,
            drain_attempts: DEFAULT_DRAIN_ATTEMPTS,
            min_trailing: DEFAULT_MIN_TRAILING,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
        }
    }
}
