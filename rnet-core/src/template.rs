//! Typed message templates
//!
//! Every RNET message the client sends (and every response it waits for) is
//! described by a fixed table of tokens. A token is either a literal byte or
//! a placeholder filled from [`Fields`] when the template is rendered.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::{
    constants::{DEFAULT_KEYPAD, MAX_DATA_BYTE, WILDCARD},
    error::{Error, Result},
    message::Message,
    signature::Signature,
};

/// A single template position
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal protocol byte
    Byte(u8),

    /// Controller id, 0-based on the wire
    Controller,

    /// Zone id, 0-based on the wire; omitted when no zone is given
    Zone,

    /// Sender keypad id
    Keypad,

    /// Command parameter; omitted when no parameter is given
    Parameter,

    /// Any byte (signatures only)
    Wildcard,
}

/// Values substituted into a template
///
/// Controller and zone are 1-based, as the caller sees them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fields {
    pub controller: Option<u8>,
    pub zone: Option<u8>,
    pub keypad: u8,
    pub parameter: Option<u8>,
}

impl Fields {
    /// Fields addressing one zone of one controller
    pub fn zone(controller: u8, zone: u8) -> Self {
        Self {
            controller: Some(controller),
            zone: Some(zone),
            ..Self::default()
        }
    }

    /// Set the sender keypad id
    pub fn with_keypad(mut self, keypad: u8) -> Self {
        self.keypad = keypad;
        self
    }

    /// Set the command parameter
    pub fn with_parameter(mut self, parameter: u8) -> Self {
        self.parameter = Some(parameter);
        self
    }
}

impl Default for Fields {
    fn default() -> Self {
        Self {
            controller: None,
            zone: None,
            keypad: DEFAULT_KEYPAD,
            parameter: None,
        }
    }
}

/// A named, fixed sequence of tokens
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Template {
    name: &'static str,
    tokens: &'static [Token],
}

impl Template {
    pub const fn new(name: &'static str, tokens: &'static [Token]) -> Self {
        Self { name, tokens }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tokens(&self) -> &'static [Token] {
        self.tokens
    }

    /// Build a sendable message: render the body, then append checksum and
    /// terminator
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if controller or zone is 0, or an encoded value
    ///   exceeds the 7-bit data range
    /// - `MissingField` if the template names a controller and none is given
    /// - `WildcardInCommand` if the template contains a wildcard
    ///
    /// # Examples
    ///
    /// ```
    /// use rnet_core::{Command, Fields};
    ///
    /// let fields = Fields::zone(1, 1).with_parameter(1);
    /// let message = Command::SetPower.template().build(&fields).unwrap();
    /// assert_eq!(message.body()[1], 0x00);
    /// assert_eq!(message.body()[15], 0x01);
    /// ```
    pub fn build(&self, fields: &Fields) -> Result<Message> {
        if self.tokens.contains(&Token::Wildcard) {
            return Err(Error::WildcardInCommand(self.name));
        }

        let body = self.render(fields)?;
        let message = Message::finalize(body);

        trace!(template = self.name, frame = %message, "Built message");

        Ok(message)
    }

    /// Build a response signature: wildcards become [`WILDCARD`], every other
    /// token is rendered as for [`Template::build`]
    pub fn signature(&self, fields: &Fields) -> Result<Signature> {
        let pattern: Bytes = self.render(fields)?.freeze();
        Ok(Signature::new(pattern))
    }

    fn render(&self, fields: &Fields) -> Result<BytesMut> {
        let mut body = BytesMut::with_capacity(self.tokens.len());

        for token in self.tokens {
            match *token {
                Token::Byte(byte) => body.put_u8(byte),
                Token::Wildcard => body.put_u8(WILDCARD),
                Token::Keypad => body.put_u8(data_byte("keypad", fields.keypad)?),
                Token::Controller => {
                    let controller = fields.controller.ok_or(Error::MissingField {
                        template: self.name,
                        field: "controller",
                    })?;
                    body.put_u8(zero_based("controller", controller)?);
                }
                Token::Zone => {
                    if let Some(zone) = fields.zone {
                        body.put_u8(zero_based("zone", zone)?);
                    }
                }
                Token::Parameter => {
                    if let Some(parameter) = fields.parameter {
                        body.put_u8(data_byte("parameter", parameter)?);
                    }
                }
            }
        }

        Ok(body)
    }
}

/// Convert a 1-based id to its 0-based wire value
pub fn zero_based(field: &'static str, id: u8) -> Result<u8> {
    if id < 1 {
        return Err(Error::invalid(field, id, "ids start at 1"));
    }
    data_byte(field, id - 1)
}

fn data_byte(field: &'static str, value: u8) -> Result<u8> {
    if value > MAX_DATA_BYTE {
        return Err(Error::invalid(field, value, "exceeds the 7-bit data range"));
    }
    Ok(value)
}
