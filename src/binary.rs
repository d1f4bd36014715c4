//! Cursor-based binary readers and writers for match stream payloads.
//!
//! Every reader takes the payload and a mutable cursor, reads one fixed-width
//! big-endian value, and advances the cursor by that width. All readers check
//! bounds first and leave the cursor untouched when the payload is too short.
//!
//! # Endianness
//!
//! All multi-byte fields in the device protocol are big-endian. Floats are
//! IEEE-754 single precision transmitted as their big-endian bit pattern.
//!
//! # Example
//!
//! ```
//! use melee_stats::binary::{read_u8, read_u16_be, read_f32_be};
//!
//! let data = [0x37, 0x00, 0x20, 0x3F, 0x80, 0x00, 0x00];
//! let mut offset = 1;
//!
//! assert_eq!(read_u16_be(&data, &mut offset).unwrap(), 32);
//! assert_eq!(read_f32_be(&data, &mut offset).unwrap(), 1.0);
//! assert_eq!(offset, 7);
//! assert!(read_u8(&data, &mut offset).is_err());
//! ```

use crate::error::{ParserError, Result};

/// Borrows `N` bytes at the cursor and advances it.
fn take<'a, const N: usize>(bytes: &'a [u8], offset: &mut usize) -> Result<&'a [u8; N]> {
    let end = offset
        .checked_add(N)
        .ok_or_else(|| ParserError::truncated(usize::MAX, bytes.len()))?;

    let array: &[u8; N] = bytes
        .get(*offset..end)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| ParserError::truncated(end, bytes.len()))?;

    *offset = end;
    Ok(array)
}

/// Reads a single byte and advances the cursor by 1.
///
/// # Errors
///
/// Returns `ParserError::TruncatedMessage` if the cursor is at the end of the
/// buffer.
pub fn read_u8(bytes: &[u8], offset: &mut usize) -> Result<u8> {
    let [value] = *take::<1>(bytes, offset)?;
    Ok(value)
}

/// Reads a big-endian u16 and advances the cursor by 2.
///
/// # Errors
///
/// Returns `ParserError::TruncatedMessage` if fewer than 2 bytes remain.
///
/// # Example
///
/// ```
/// use melee_stats::binary::read_u16_be;
///
/// let data = [0x12, 0x34];
/// let mut offset = 0;
/// assert_eq!(read_u16_be(&data, &mut offset).unwrap(), 0x1234);
/// ```
pub fn read_u16_be(bytes: &[u8], offset: &mut usize) -> Result<u16> {
    Ok(u16::from_be_bytes(*take::<2>(bytes, offset)?))
}

/// Reads a big-endian u32 and advances the cursor by 4.
///
/// # Errors
///
/// Returns `ParserError::TruncatedMessage` if fewer than 4 bytes remain.
pub fn read_u32_be(bytes: &[u8], offset: &mut usize) -> Result<u32> {
    Ok(u32::from_be_bytes(*take::<4>(bytes, offset)?))
}

/// Reads a big-endian IEEE-754 f32 and advances the cursor by 4.
///
/// # Errors
///
/// Returns `ParserError::TruncatedMessage` if fewer than 4 bytes remain.
pub fn read_f32_be(bytes: &[u8], offset: &mut usize) -> Result<f32> {
    Ok(f32::from_be_bytes(*take::<4>(bytes, offset)?))
}

/// Appends a big-endian u16.
pub fn write_u16_be(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Appends a big-endian u32.
pub fn write_u32_be(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Appends a big-endian f32 bit pattern.
pub fn write_f32_be(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_be_bytes());
}
