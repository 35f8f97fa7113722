//! Transport layer for the RNET protocol
//!
//! Provides the TCP link to a controller (or a serial-to-TCP gateway).

pub mod tcp;
pub mod error;

pub use error::{Error, Result};
pub use tcp::TcpTransport;

use async_trait::async_trait;
use bytes::BytesMut;

/// Transport trait for different communication methods
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to controller
    async fn connect(&mut self) -> Result<()>;

    /// Disconnect from controller
    async fn disconnect(&mut self) -> Result<()>;

    /// Best-effort liveness check, never fails
    fn is_connected(&self) -> bool;

    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read whatever has arrived without waiting
    ///
    /// Returns an empty buffer when nothing is pending.
    fn try_receive(&mut self) -> Result<BytesMut>;

    /// Get remote address
    fn remote_addr(&self) -> String;
}
