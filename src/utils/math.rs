//! Mathematical utility functions.

use crate::Result;

/// Converts a `usize` to `u32` for pickle serialization, returning an error if the value
/// exceeds `u32::MAX`. Entry counts, payload lengths and entry indices are all written
/// as NAT values decoded into `u32`.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if `value` exceeds `u32::MAX`.
pub fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| malformed_error!("Signature value {value} exceeds u32::MAX"))
}
