//! # rnet-core
//!
//! Core protocol implementation for Russound RNET controllers.
//!
//! This crate provides the low-level protocol primitives:
//! - Message framing and checksum calculation
//! - Typed message templates and the command table
//! - Response signatures and stream reassembly
//! - Session lifecycle
//! - Protocol constants

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod message;
pub mod session;
pub mod signature;
pub mod template;

pub use command::Command;
pub use error::{Error, Result};
pub use message::Message;
pub use session::{Session, SessionState};
pub use signature::{find_message, Reassembler, Signature};
pub use template::{Fields, Template, Token};
