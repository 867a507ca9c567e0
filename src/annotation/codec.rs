//! Text encoding of pickle bytes inside a signature annotation.
//!
//! Annotation values are stored in the class file constant pool as modified UTF-8, where
//! bytes `0x01..=0x7f` are the cheapest to store. [`SevenBitCodec`] packs the pickle into
//! 7-bit units and shifts every unit by one so that the common value `0x00` becomes `0x01`;
//! the one unit that wraps around, `0x7f`, is stored as U+0000.

use crate::{Error, Result};

/// Converts between pickle bytes and annotation text.
///
/// Implementations must be thread-safe so a single codec can be shared by the workers of
/// [`crate::shade::Shader::shade_all`].
pub trait TextCodec: Send + Sync {
    /// Encodes pickle bytes as annotation text.
    fn encode(&self, bytes: &[u8]) -> String;

    /// Decodes annotation text back into pickle bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidEncoding`] if `text` is not a valid encoding.
    fn decode(&self, text: &str) -> Result<Vec<u8>>;
}

/// The 8-to-7 bit packing used by signature annotations.
///
/// Input bytes are read as a little-endian bit stream and cut into 7-bit units, so `n`
/// bytes become `ceil(8n/7)` characters. Decoding `m` characters yields `ceil(7m/8)` bytes,
/// which can be one more than was encoded; that extra byte is always `0x00`.
///
/// # Examples
///
/// ```rust
/// use sigshade::annotation::{SevenBitCodec, TextCodec};
///
/// let codec = SevenBitCodec;
/// let text = codec.encode(&[0x05, 0x00]);
/// assert_eq!(text, "\u{06}\u{01}\u{01}");
/// assert_eq!(codec.decode(&text)?, [0x05, 0x00, 0x00]);
/// # Ok::<(), sigshade::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SevenBitCodec;

impl TextCodec for SevenBitCodec {
    fn encode(&self, bytes: &[u8]) -> String {
        let mut text = String::with_capacity((bytes.len() * 8).div_ceil(7));
        let mut push = |unit: u32| text.push(char::from(((unit + 1) & 0x7F) as u8));

        let mut acc = 0u32;
        let mut bits = 0;
        for &byte in bytes {
            acc |= u32::from(byte) << bits;
            bits += 8;
            while bits >= 7 {
                push(acc & 0x7F);
                acc >>= 7;
                bits -= 7;
            }
        }
        if bits > 0 {
            push(acc & 0x7F);
        }

        text
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity((text.len() * 7).div_ceil(8));

        let mut acc = 0u32;
        let mut bits = 0;
        for (offset, c) in text.char_indices() {
            if !c.is_ascii() {
                return Err(Error::InvalidEncoding(format!(
                    "character U+{:04X} at offset {offset} is outside the 7-bit range",
                    u32::from(c)
                )));
            }
            let unit = (u32::from(c) + 0x7F) & 0x7F;

            acc |= unit << bits;
            bits += 7;
            if bits >= 8 {
                bytes.push((acc & 0xFF) as u8);
                acc >>= 8;
                bits -= 8;
            }
        }
        if bits > 0 {
            bytes.push((acc & 0xFF) as u8);
        }

        Ok(bytes)
    }
}
