//! Session lifecycle for an RNET connection
//!
//! A session moves one way through its states:
//! `Unconnected -> Connected -> Closed`. A failed connect leaves it
//! `Unconnected`; a closed session cannot be reopened.

use std::sync::Arc;

use crate::error::{Error, Result};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, no socket connected yet
    Unconnected,

    /// Socket connected, zone operations allowed
    Connected,

    /// Torn down; a new session is required
    Closed,
}

/// Session state tracker
///
/// Thread-safe and can be cloned cheaply (Arc internally).
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<parking_lot::RwLock<SessionState>>,
}

impl Session {
    /// Create a new unconnected session
    pub fn new() -> Self {
        Self {
            state: Arc::new(parking_lot::RwLock::new(SessionState::Unconnected)),
        }
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        matches!(self.state(), SessionState::Connected)
    }

    /// Check if closed
    pub fn is_closed(&self) -> bool {
        matches!(self.state(), SessionState::Closed)
    }

    /// Fail unless zone operations are currently allowed
    pub fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    /// Mark the socket as connected
    pub fn open(&self) -> Result<()> {
        let mut state = self.state.write();

        if *state != SessionState::Unconnected {
            return Err(Error::InvalidSessionState(format!(
                "Cannot connect from state: {:?}",
                *state
            )));
        }

        *state = SessionState::Connected;
        Ok(())
    }

    /// Close session
    ///
    /// Closing is allowed from any state and is final.
    pub fn close(&self) {
        *self.state.write() = SessionState::Closed;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
