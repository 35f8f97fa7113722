//! RNET checksum algorithm
//!
//! From the RNET protocol document:
//! 1. Sum every byte of the message, start marker included
//! 2. Add the number of bytes summed
//! 3. Keep the low 7 bits
//!
//! The checksum byte and the 0xF7 terminator are not part of the sum.

use tracing::trace;

use crate::constants::{CHECKSUM_MASK, END_OF_MESSAGE};

/// Calculate RNET message checksum
///
/// # Algorithm
///
/// ```text
/// checksum = (b[0] + b[1] + ... + b[n-1] + n) & 0x7F
/// ```
///
/// # Examples
///
/// ```
/// use rnet_core::checksum;
///
/// assert_eq!(checksum::calculate(&[]), 0);
/// assert_eq!(checksum::calculate(&[0xF0, 0x00]), 0x72);
/// ```
pub fn calculate(body: &[u8]) -> u8 {
    let sum = body
        .iter()
        .fold(body.len(), |acc, &byte| acc.wrapping_add(byte as usize));

    let checksum = (sum & CHECKSUM_MASK as usize) as u8;

    trace!(
        len = body.len(),
        checksum = format!("0x{:02X}", checksum),
        "Calculated checksum"
    );

    checksum
}

/// Verify the checksum of a complete frame (`body ++ [checksum, 0xF7]`)
pub fn verify(frame: &[u8]) -> bool {
    match frame {
        [body @ .., checksum, END_OF_MESSAGE] => calculate(body) == *checksum,
        _ => false,
    }
}
