//! RNET command templates
//!
//! Byte layouts follow the RNET protocol document. Offsets are bit-exact:
//! the controller parses these frames positionally.

use std::fmt;

use crate::{
    constants::events,
    error::Result,
    message::Message,
    signature::Signature,
    template::{Fields, Template, Token},
};

use Token::{Byte, Controller, Keypad, Parameter, Wildcard, Zone};

/// `F0 cc 00 7F 00 00 kk 05 02 02 00 00 F1 23 00 pr 00 zz 00 01`
pub const SET_POWER: Template = Template::new(
    "SET_POWER",
    &[
        Byte(0xF0), Controller, Byte(0x00), Byte(0x7F), Byte(0x00), Byte(0x00), Keypad,
        Byte(0x05), Byte(0x02), Byte(0x02), Byte(0x00), Byte(0x00), Byte(0xF1),
        Byte(events::POWER), Byte(0x00), Parameter, Byte(0x00), Zone, Byte(0x00), Byte(0x01),
    ],
);

/// `F0 cc 00 7F 00 00 kk 05 02 02 00 00 F1 21 00 pr 00 zz 00 01`
pub const SET_VOLUME: Template = Template::new(
    "SET_VOLUME",
    &[
        Byte(0xF0), Controller, Byte(0x00), Byte(0x7F), Byte(0x00), Byte(0x00), Keypad,
        Byte(0x05), Byte(0x02), Byte(0x02), Byte(0x00), Byte(0x00), Byte(0xF1),
        Byte(events::VOLUME), Byte(0x00), Parameter, Byte(0x00), Zone, Byte(0x00), Byte(0x01),
    ],
);

/// `F0 cc 00 7F 00 zz kk 05 02 00 00 00 F1 3E 00 00 00 pr 00 01`
pub const SET_SOURCE: Template = Template::new(
    "SET_SOURCE",
    &[
        Byte(0xF0), Controller, Byte(0x00), Byte(0x7F), Byte(0x00), Zone, Keypad,
        Byte(0x05), Byte(0x02), Byte(0x00), Byte(0x00), Byte(0x00), Byte(0xF1),
        Byte(events::SOURCE), Byte(0x00), Byte(0x00), Byte(0x00), Parameter, Byte(0x00), Byte(0x01),
    ],
);

/// `F0 7F 00 7F 00 00 kk 05 02 02 00 00 F1 22 00 00 pr 00 00 01`
pub const ALL_ON_OFF: Template = Template::new(
    "ALL_ON_OFF",
    &[
        Byte(0xF0), Byte(0x7F), Byte(0x00), Byte(0x7F), Byte(0x00), Byte(0x00), Keypad,
        Byte(0x05), Byte(0x02), Byte(0x02), Byte(0x00), Byte(0x00), Byte(0xF1),
        Byte(events::ALL_ON_OFF), Byte(0x00), Byte(0x00), Parameter, Byte(0x00), Byte(0x00), Byte(0x01),
    ],
);

/// `F0 cc 00 7F 00 zz kk 05 02 02 00 00 F1 40 00 00 00 0D 00 01`
pub const TOGGLE_MUTE: Template = Template::new(
    "TOGGLE_MUTE",
    &[
        Byte(0xF0), Controller, Byte(0x00), Byte(0x7F), Byte(0x00), Zone, Keypad,
        Byte(0x05), Byte(0x02), Byte(0x02), Byte(0x00), Byte(0x00), Byte(0xF1),
        Byte(events::KEY_PRESS), Byte(0x00), Byte(0x00), Byte(0x00), Byte(events::KEY_MUTE), Byte(0x00), Byte(0x01),
    ],
);

/// `F0 cc 00 7F 00 00 kk 01 04 02 00 zz 07 00 00`
pub const REQUEST_ZONE_INFO: Template = Template::new(
    "REQUEST_ZONE_INFO",
    &[
        Byte(0xF0), Controller, Byte(0x00), Byte(0x7F), Byte(0x00), Byte(0x00), Keypad,
        Byte(0x01), Byte(0x04), Byte(0x02), Byte(0x00), Zone, Byte(0x07), Byte(0x00), Byte(0x00),
    ],
);

/// `F0 ** ** kk cc ** ** ** ** 04 02 00 zz 07 00 00 01 00 0C 00 pw sr vl`
///
/// Reply to [`REQUEST_ZONE_INFO`]. The three trailing wildcards are the
/// power, source and volume bytes.
pub const ZONE_INFO_RESPONSE: Template = Template::new(
    "ZONE_INFO_RESPONSE",
    &[
        Byte(0xF0), Wildcard, Wildcard, Keypad, Controller, Wildcard, Wildcard, Wildcard, Wildcard,
        Byte(0x04), Byte(0x02), Byte(0x00), Zone, Byte(0x07), Byte(0x00), Byte(0x00),
        Byte(0x01), Byte(0x00), Byte(0x0C), Byte(0x00), Wildcard, Wildcard, Wildcard,
    ],
);

/// Commands the client can send
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    SetPower,
    SetVolume,
    SetSource,
    AllOnOff,
    ToggleMute,
    RequestZoneInfo,
}

impl Command {
    /// Template used to build this command
    pub fn template(self) -> &'static Template {
        match self {
            Self::SetPower => &SET_POWER,
            Self::SetVolume => &SET_VOLUME,
            Self::SetSource => &SET_SOURCE,
            Self::AllOnOff => &ALL_ON_OFF,
            Self::ToggleMute => &TOGGLE_MUTE,
            Self::RequestZoneInfo => &REQUEST_ZONE_INFO,
        }
    }

    /// Signature of the reply worth waiting for, if any
    ///
    /// Commands without one are fire-and-forget: whatever the controller
    /// echoes is drained and discarded.
    pub fn response(self) -> Option<&'static Template> {
        match self {
            Self::RequestZoneInfo => Some(&ZONE_INFO_RESPONSE),
            _ => None,
        }
    }

    /// Check if the controller answers this command with data
    pub fn expects_response(self) -> bool {
        self.response().is_some()
    }

    /// Build the message for this command
    pub fn build(self, fields: &Fields) -> Result<Message> {
        self.template().build(fields)
    }

    /// Build the response signature for this command, if it has one
    pub fn signature(self, fields: &Fields) -> Result<Option<Signature>> {
        self.response()
            .map(|template| template.signature(fields))
            .transpose()
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        self.template().name()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
