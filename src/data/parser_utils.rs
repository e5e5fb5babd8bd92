//! Shared winnow-based parsing utilities used by the 4DS container decoder.
//!
//! All multi-byte quantities in the container are little-endian. These
//! helpers are the only place raw bytes are interpreted; every failed read
//! surfaces as a winnow error which the decoder maps to
//! [`Error::UnexpectedEndOfData`](crate::error::Error::UnexpectedEndOfData).

use winnow::Parser;
use winnow::binary::{le_f32, length_take, u8};
use winnow::error::ContextError;

/// Common result type for winnow parsers.
pub type WResult<T> = Result<T, winnow::error::ErrMode<ContextError>>;

/// Parse three little-endian f32s as a position or scale vector.
pub fn parse_vec3(input: &mut &[u8]) -> WResult<[f32; 3]> {
    let x = le_f32.parse_next(input)?;
    let y = le_f32.parse_next(input)?;
    let z = le_f32.parse_next(input)?;
    Ok([x, y, z])
}

/// Parse four little-endian f32s as an (x, y, z, w) quaternion.
pub fn parse_quat(input: &mut &[u8]) -> WResult<[f32; 4]> {
    let x = le_f32.parse_next(input)?;
    let y = le_f32.parse_next(input)?;
    let z = le_f32.parse_next(input)?;
    let w = le_f32.parse_next(input)?;
    Ok([x, y, z, w])
}

/// Parse two little-endian f32s as a UV pair, as stored in the container.
pub fn parse_uv(input: &mut &[u8]) -> WResult<[f32; 2]> {
    let u = le_f32.parse_next(input)?;
    let v = le_f32.parse_next(input)?;
    Ok([u, v])
}

/// Parse a u8-length-prefixed string (not NUL-terminated).
///
/// Names in the container are raw engine strings; invalid UTF-8 is replaced
/// rather than rejected.
pub fn parse_pstr(input: &mut &[u8]) -> WResult<String> {
    let bytes: &[u8] = length_take(u8).parse_next(input)?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}
