//! Type definitions for rnet

pub mod error;
pub mod zone;

pub use error::{Error, Result};
pub use zone::{volume_from_device, volume_to_device, ZoneField, ZoneInfo};
