//! RNET message framing

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    constants::{END_OF_MESSAGE, START_OF_MESSAGE},
};

/// A finalized RNET message, ready to be written to the wire
///
/// # Message Structure
///
/// ```text
/// ┌──────┬──────────────────────────────┬──────────┬──────┐
/// │ 0xF0 │            Body              │ Checksum │ 0xF7 │
/// │ 1 B  │  N bytes (template defined)  │   1 B    │ 1 B  │
/// └──────┴──────────────────────────────┴──────────┴──────┘
/// ```
///
/// The checksum covers the start marker and the body.
///
/// # Examples
///
/// ```
/// use rnet_core::Message;
/// use bytes::BytesMut;
///
/// let message = Message::finalize(BytesMut::from(&[0xF0, 0x00][..]));
/// assert_eq!(message.as_ref(), &[0xF0, 0x00, 0x72, 0xF7]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Message {
    frame: Bytes,
}

impl Message {
    /// Trailer size (checksum + terminator)
    pub const TRAILER_SIZE: usize = 2;

    /// Append checksum and terminator to a message body
    ///
    /// Consumes the body so a message can never be finalized twice.
    pub fn finalize(mut body: BytesMut) -> Self {
        let checksum = checksum::calculate(&body);
        body.reserve(Self::TRAILER_SIZE);
        body.put_u8(checksum);
        body.put_u8(END_OF_MESSAGE);

        Self {
            frame: body.freeze(),
        }
    }

    /// Message bytes before the checksum
    pub fn body(&self) -> &[u8] {
        &self.frame[..self.frame.len() - Self::TRAILER_SIZE]
    }

    /// Checksum byte carried by this message
    pub fn checksum(&self) -> u8 {
        self.frame[self.frame.len() - Self::TRAILER_SIZE]
    }

    /// Check framing markers and checksum
    pub fn is_well_formed(&self) -> bool {
        self.frame.first() == Some(&START_OF_MESSAGE) && checksum::verify(&self.frame)
    }

    /// Total size on the wire
    pub fn size(&self) -> usize {
        self.frame.len()
    }

    /// Render as space separated upper-case hex tokens (`F0 00 7F ...`)
    pub fn to_hex_tokens(&self) -> String {
        hex_tokens(&self.frame)
    }
}

/// Render bytes as space separated upper-case hex tokens
pub fn hex_tokens(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| hex::encode_upper([*byte]))
        .collect::<Vec<_>>()
        .join(" ")
}

impl AsRef<[u8]> for Message {
    fn as_ref(&self) -> &[u8] {
        &self.frame
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("len", &self.frame.len())
            .field("checksum", &format!("0x{:02X}", self.checksum()))
            .field("frame", &self.to_hex_tokens())
            .finish()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.to_hex_tokens())
    }
}
