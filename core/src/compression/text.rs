//! compression/text.rs
//! UTF-16 byte framing with surrogate pass-through.
//!
//! Unpaired surrogates are written and read like any other code unit, so the
//! byte form is a faithful image of the source text even when it is not
//! well-formed Unicode.

use crate::compression::constants::{UTF16_BE_BOM, UTF16_LE_BOM};
use crate::compression::types::CompressionError;

/// Encode code units as little-endian UTF-16 prefixed with a byte-order mark.
pub fn encode_utf16_surrogatepass(units: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(UTF16_LE_BOM.len() + units.len() * 2);
    out.extend_from_slice(&UTF16_LE_BOM);
    for unit in units {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

/// Decode UTF-16 bytes, honouring a leading BOM. Without one, little-endian is assumed.
pub fn decode_utf16_surrogatepass(bytes: &[u8]) -> Result<Vec<u16>, CompressionError> {
    let (body, big_endian) = match bytes {
        [a, b, rest @ ..] if [*a, *b] == UTF16_LE_BOM => (rest, false),
        [a, b, rest @ ..] if [*a, *b] == UTF16_BE_BOM => (rest, true),
        _ => (bytes, false),
    };

    if body.len() % 2 != 0 {
        return Err(CompressionError::OddUtf16Length { len: body.len() });
    }

    Ok(body
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            if big_endian {
                u16::from_be_bytes(pair)
            } else {
                u16::from_le_bytes(pair)
            }
        })
        .collect())
}

/// Convert code units into a `String`, rejecting lone surrogates.
pub fn units_to_string(units: &[u16]) -> Result<String, CompressionError> {
    char::decode_utf16(units.iter().copied())
        .collect::<Result<String, _>>()
        .map_err(|e| CompressionError::LoneSurrogate { unit: e.unpaired_surrogate() })
}
