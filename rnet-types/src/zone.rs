//! Zone state structures

use std::fmt;

use crate::error::{Error, Result};

/// Largest volume callers may request
pub const MAX_VOLUME: u8 = 100;

/// Convert a caller volume (0-100) to device units (0-50)
///
/// Odd volumes lose their low bit: `101 -> 50`.
pub fn volume_to_device(volume: u8) -> u8 {
    volume / 2
}

/// Convert device units (0-50) back to a caller volume (0-100)
pub fn volume_from_device(level: u8) -> u8 {
    level.saturating_mul(2)
}

/// Zone attribute readable from a zone info reply
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ZoneField {
    Power,
    Source,
    Volume,
}

impl ZoneField {
    /// Position of this field in the zone info payload
    pub fn index(self) -> usize {
        match self {
            Self::Power => 0,
            Self::Source => 1,
            Self::Volume => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Source => "source",
            Self::Volume => "volume",
        }
    }
}

impl fmt::Display for ZoneField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Zone state reported by a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneInfo {
    /// Power flag (0 = off, 1 = on)
    pub power: u8,

    /// 0-based source index
    pub source: u8,

    /// Volume on the caller scale (0-100)
    pub volume: u8,
}

impl ZoneInfo {
    /// Parse the power/source/volume bytes of a zone info payload
    ///
    /// Volume is converted from device units.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        match payload {
            [power, source, level, ..] => Ok(Self {
                power: *power,
                source: *source,
                volume: volume_from_device(*level),
            }),
            _ => Err(Error::Validation(format!(
                "zone info payload needs 3 bytes, got {}",
                payload.len()
            ))),
        }
    }

    /// Get a single field
    pub fn get(&self, field: ZoneField) -> u8 {
        match field {
            ZoneField::Power => self.power,
            ZoneField::Source => self.source,
            ZoneField::Volume => self.volume,
        }
    }

    pub fn is_on(&self) -> bool {
        self.power != 0
    }
}

impl fmt::Display for ZoneInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zone[power: {}, source: {}, volume: {}]",
            if self.is_on() { "on" } else { "off" },
            self.source,
            self.volume
        )
    }
}
