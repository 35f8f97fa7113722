//! Response signatures and stream reassembly
//!
//! The controller streams every message it produces over the same socket:
//! replies to our requests, keypad events, replies meant for other senders.
//! A [`Signature`] describes the one reply we are waiting for, and
//! [`find_message`] picks it out of whatever has been read so far.

use bytes::{Bytes, BytesMut};
use std::fmt;
use tracing::trace;

use crate::constants::{DEFAULT_MIN_TRAILING, END_OF_MESSAGE, WILDCARD};
use crate::message::hex_tokens;

/// A message pattern where [`WILDCARD`] positions match any byte
#[derive(Clone, PartialEq, Eq)]
pub struct Signature {
    pattern: Bytes,
}

impl Signature {
    pub fn new(pattern: impl Into<Bytes>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Check whether `window` starts with this signature
    ///
    /// Returns false when `window` is shorter than the signature.
    pub fn matches(&self, window: &[u8]) -> bool {
        window.len() >= self.pattern.len()
            && self
                .pattern
                .iter()
                .zip(window)
                .all(|(&expected, &actual)| expected == WILDCARD || expected == actual)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature[{}]", hex_tokens(&self.pattern).replace("FF", "**"))
    }
}

/// Locate a message matching `signature` in `stream`
///
/// A match at index `i` requires every non-wildcard position to agree and at
/// least `min_trailing` bytes from `i` onward, so a reply cut short by a
/// fragmented read is never accepted.
///
/// On a match, returns everything from the start of the match to the end of
/// the buffered stream and an empty remainder. Otherwise returns `None` and
/// the bytes following the last end marker seen: complete frames already
/// ruled out are not rescanned on the next call.
///
/// # Examples
///
/// ```
/// use bytes::BytesMut;
/// use rnet_core::{find_message, Signature};
///
/// let signature = Signature::new(vec![0xF0, 0xFF, 0x07]);
///
/// let (found, rest) = find_message(BytesMut::from(&[0x01, 0xF7, 0xF0][..]), &signature, 3);
/// assert!(found.is_none());
/// assert_eq!(&rest[..], &[0xF0]);
///
/// let (found, _) = find_message(BytesMut::from(&[0xF0, 0x55, 0x07][..]), &signature, 3);
/// assert_eq!(found.as_deref(), Some(&[0xF0, 0x55, 0x07][..]));
/// ```
pub fn find_message(
    mut stream: BytesMut,
    signature: &Signature,
    min_trailing: usize,
) -> (Option<Bytes>, BytesMut) {
    let mut last_end = None;

    for i in 0..stream.len() {
        if stream[i] == END_OF_MESSAGE {
            last_end = Some(i);
        }

        if stream.len() - i >= min_trailing && signature.matches(&stream[i..]) {
            trace!(offset = i, len = stream.len() - i, "Signature matched");
            let message = stream.split_off(i).freeze();
            return (Some(message), BytesMut::new());
        }
    }

    if let Some(end) = last_end {
        trace!(discarded = end + 1, "Discarding scanned frames");
        let remainder = stream.split_off(end + 1);
        return (None, remainder);
    }

    (None, stream)
}

/// Accumulates reads for one exchange and runs the matcher on each
#[derive(Debug)]
pub struct Reassembler {
    signature: Signature,
    min_trailing: usize,
    buffer: BytesMut,
}

impl Reassembler {
    pub fn new(signature: Signature) -> Self {
        Self {
            signature,
            min_trailing: DEFAULT_MIN_TRAILING,
            buffer: BytesMut::new(),
        }
    }

    /// Set the number of bytes a candidate needs before it may match
    pub fn with_min_trailing(mut self, min_trailing: usize) -> Self {
        self.min_trailing = min_trailing;
        self
    }

    /// Append newly read bytes and look for the signature
    pub fn feed(&mut self, chunk: &[u8]) -> Option<Bytes> {
        self.buffer.extend_from_slice(chunk);

        let stream = std::mem::take(&mut self.buffer);
        let (found, remainder) = find_message(stream, &self.signature, self.min_trailing);
        self.buffer = remainder;

        found
    }

    /// Bytes waiting for more input
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }
}
