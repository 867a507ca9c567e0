//! Low-level byte stream parser for signature pickle decoding.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a cursor-based binary data parser
//! used to read the NAT-encoded header, entry framing and entry payloads of a signature pickle.
//! Every read is bounds-checked; running out of data is reported as
//! [`crate::Error::UnexpectedEndOfData`] rather than panicking.
//!
//! # Key Components
//!
//! ## Navigation Methods
//! - [`crate::file::parser::Parser::pos`] - Get current position
//! - [`crate::file::parser::Parser::remaining`] - Bytes left after the current position
//! - [`crate::file::parser::Parser::transactional`] - Roll back the position when a read fails
//!
//! ## Data Access Methods
//! - [`crate::file::parser::Parser::read_u8`] - Read a single byte
//! - [`crate::file::parser::Parser::peek_byte`] - Peek at current byte without advancing
//! - [`crate::file::parser::Parser::read_nat`] - Read a NAT variable-length integer
//! - [`crate::file::parser::Parser::read_bytes`] - Borrow a fixed-length slice
//!
//! # Usage Examples
//!
//! ```rust
//! use sigshade::Parser;
//!
//! // major 5, minor 0, one entry of type 1 with a 3 byte payload
//! let data = [0x05, 0x00, 0x01, 0x01, 0x03, b'c', b'o', b'm'];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_nat()?, 5);
//! assert_eq!(parser.read_nat()?, 0);
//! assert_eq!(parser.read_nat()?, 1);
//! assert_eq!(parser.read_u8()?, 1);
//! let len = parser.read_nat()? as usize;
//! assert_eq!(parser.read_bytes(len)?, b"com");
//! assert!(!parser.has_more_data());
//! # Ok::<(), sigshade::Error>(())
//! ```

use crate::{Error, Result};

/// A cursor over a borrowed byte slice.
///
/// `Parser` keeps a position into the data and advances it on every successful read.
/// Failed reads leave the position where the failing read started, except for
/// [`Parser::read_nat`] which may have consumed continuation bytes before hitting the end;
/// wrap the call in [`Parser::transactional`] when the position must be restored.
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Returns the number of bytes left after the current position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigshade::Parser;
    /// let data = [0x01, 0x02, 0x03, 0x04, 0x05];
    /// let mut parser = Parser::new(&data);
    ///
    /// assert_eq!(parser.remaining(), 5);
    /// parser.read_bytes(2)?;
    /// assert_eq!(parser.remaining(), 3);
    /// # Ok::<(), sigshade::Error>(())
    /// ```
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Peek at the next byte without advancing the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedEndOfData`] if position is at or beyond the data length.
    pub fn peek_byte(&self) -> Result<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or(Error::UnexpectedEndOfData)
    }

    /// Read a single byte and advance the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedEndOfData`] if no byte is left.
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek_byte()?;
        self.position += 1;
        Ok(byte)
    }

    /// Read a NAT encoded unsigned integer.
    ///
    /// Each byte contributes its low 7 bits, most significant group first
    /// (`acc = acc << 7 | byte & 0x7f`). A byte with the high bit clear terminates the value.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedEndOfData`] if the data ends before a terminating byte,
    /// or [`crate::Error::Malformed`] if the value does not fit into a `u32`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigshade::Parser;
    ///
    /// let data = [0x7F, 0x81, 0x00, 0x82, 0x2C];
    /// let mut parser = Parser::new(&data);
    /// assert_eq!(parser.read_nat()?, 127);
    /// assert_eq!(parser.read_nat()?, 128);
    /// assert_eq!(parser.read_nat()?, 300);
    /// # Ok::<(), sigshade::Error>(())
    /// ```
    pub fn read_nat(&mut self) -> Result<u32> {
        let mut value = 0u32;

        loop {
            let byte = self.read_u8()?;

            if value > (u32::MAX >> 7) {
                return Err(malformed_error!(
                    "NAT value overflow at offset {} - exceeds u32 capacity",
                    self.position - 1
                ));
            }
            value = (value << 7) | u32::from(byte & 0x7F);

            if (byte & 0x80) == 0 {
                return Ok(value);
            }
        }
    }

    /// Calculates an end position safely with overflow checking.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedEndOfData`] if the calculation would overflow
    /// or if the resulting position exceeds the data length.
    pub fn calc_end_position(&self, length: usize) -> Result<usize> {
        let end = self
            .position
            .checked_add(length)
            .ok_or(Error::UnexpectedEndOfData)?;

        if end > self.data.len() {
            return Err(Error::UnexpectedEndOfData);
        }

        Ok(end)
    }

    /// Reads a slice of bytes of the specified length from the current position.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedEndOfData`] if reading `length` bytes would exceed the data.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let end = self.calc_end_position(length)?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Execute a closure transactionally, rolling back on failure.
    ///
    /// The current position is saved before `f` runs and restored if `f` returns `Err`.
    ///
    /// # Errors
    /// Returns any error produced by the closure `f`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigshade::Parser;
    ///
    /// // A NAT whose continuation byte is never terminated
    /// let mut parser = Parser::new(&[0x81]);
    /// assert!(parser.transactional(|p| p.read_nat()).is_err());
    /// assert_eq!(parser.pos(), 0);
    /// ```
    pub fn transactional<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let saved_position = self.position;
        let result = f(self);
        if result.is_err() {
            self.position = saved_position;
        }
        result
    }
}
