//! BER length decoding (X.690 Section 8.1.3).
//!
//! - Short form: single byte, bit 8 = 0, value 0-127
//! - Long form: initial byte (bit 8 = 1, bits 7-1 = count), then the length bytes
//! - Indefinite form (0x80): rejected

use crate::error::DecodeErrorKind;

/// Largest length accepted, as a sanity bound on hostile input.
///
/// Real SNMP messages are at most a UDP datagram (64 KiB).
pub const MAX_LENGTH: usize = 0x200000;

/// Decode a length, returning (length, bytes consumed).
pub fn decode_length(data: &[u8]) -> Result<(usize, usize), DecodeErrorKind> {
    let Some(&first) = data.first() else {
        return Err(DecodeErrorKind::TruncatedData);
    };

    if first == 0x80 {
        return Err(DecodeErrorKind::IndefiniteLength);
    }

    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }

    let num_octets = (first & 0x7F) as usize;
    if num_octets > 4 {
        return Err(DecodeErrorKind::LengthTooLong { octets: num_octets });
    }
    let Some(octets) = data.get(1..1 + num_octets) else {
        return Err(DecodeErrorKind::TruncatedData);
    };

    let len = octets
        .iter()
        .fold(0usize, |acc, &byte| (acc << 8) | byte as usize);

    if len > MAX_LENGTH {
        return Err(DecodeErrorKind::LengthExceedsMax {
            length: len,
            max: MAX_LENGTH,
        });
    }

    Ok((len, 1 + num_octets))
}
