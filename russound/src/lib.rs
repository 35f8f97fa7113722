//! # russound
//!
//! Rust client for Russound multi-zone audio controllers speaking RNET.
//!
//! ## Features
//!
//! - Zone power, volume, source and mute control
//! - Zone state queries matched out of the controller's event stream
//! - Async/await API using Tokio, safe to share between tasks
//! - Command pacing that respects the controller's minimum command spacing
//!
//! ## Quick Start
//!
//! ```no_run
//! use russound::Russound;
//!
//! #[tokio::main]
//! async fn main() -> russound::Result<()> {
//!     // Connect to controller
//!     let client = Russound::new("192.168.1.250", 9621);
//!     client.connect().await?;
//!
//!     // Turn zone 1 of controller 1 on and read it back
//!     client.set_power(1, 1, 1).await?;
//!     println!("{:?}", client.get_zone_info(1, 1).await?);
//!
//!     // Disconnect
//!     client.close().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
mod link;

// Re-exports
pub use client::Russound;
pub use config::Config;
pub use error::{Error, Result};

// Re-export types
pub use rnet_core::{Command, Message, SessionState, Signature};
pub use rnet_transport::{TcpTransport, Transport};
pub use rnet_types::{ZoneField, ZoneInfo};
