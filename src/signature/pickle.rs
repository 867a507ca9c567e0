//! Version header and framing of a complete signature pickle.
//!
//! ```text
//! Pickle := major:NAT minor:NAT count:NAT Entry{count} [0x00]
//! Entry  := type_code:u8 length:NAT payload:u8{length}
//! ```
//!
//! The optional `0x00` trailer is an artifact of the annotation text encoding, which always
//! rounds up to whole bytes. It is accepted on input and never written.

use std::fmt;

use crate::{
    file::parser::Parser,
    signature::{table::EntryTable, types::Entry},
    utils::write_nat,
    Error, Result,
};

/// A parsed signature pickle: version header plus entry table.
///
/// # Examples
///
/// ```rust
/// use sigshade::SignaturePickle;
///
/// // 5.0 with a single term name "com" and a root namespace link to it
/// let data = [0x05, 0x00, 0x02, 0x01, 0x03, b'c', b'o', b'm', 0x0A, 0x01, 0x00];
///
/// let mut pickle = SignaturePickle::parse(&data)?;
/// assert_eq!(pickle.serialize()?, data);
///
/// assert_eq!(pickle.replace("com", "org.shaded")?, 1);
/// assert_eq!(pickle.namespaces()?.first().map(|(_, p)| p.as_str()), Some("org.shaded"));
/// # Ok::<(), sigshade::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct SignaturePickle {
    major: u32,
    minor: u32,
    table: EntryTable,
}

impl SignaturePickle {
    /// The only supported major version.
    pub const MAJOR_VERSION: u32 = 5;
    /// The only supported minor version.
    pub const MINOR_VERSION: u32 = 0;

    /// Parses a pickle from its decoded bytes.
    ///
    /// # Arguments
    /// * `data` - Pickle bytes, as produced by decoding the annotation text
    ///
    /// # Errors
    /// - [`crate::Error::UnsupportedVersion`] if the header is not 5.0; no entry is read
    /// - [`crate::Error::UnexpectedEndOfData`] if the header, an entry or a payload is truncated
    /// - [`crate::Error::TrailingData`] if bytes remain after the entries and optional trailer
    /// - [`crate::Error::Malformed`] if a NAT overflows `u32`
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut parser = Parser::new(data);

        let major = parser.read_nat()?;
        let minor = parser.read_nat()?;
        if major != Self::MAJOR_VERSION || minor != Self::MINOR_VERSION {
            return Err(Error::UnsupportedVersion { major, minor });
        }

        let count = parser.read_nat()? as usize;
        let mut table = EntryTable::new();
        for _ in 0..count {
            let type_code = parser.read_u8()?;
            let length = parser.read_nat()? as usize;
            let payload = parser.read_bytes(length)?;
            table.add_entry(type_code, payload);
        }

        if parser.has_more_data() {
            let offset = parser.pos();
            if parser.read_u8()? != 0 || parser.has_more_data() {
                return Err(Error::TrailingData {
                    offset,
                    remaining: data.len() - offset,
                });
            }
        }

        log::trace!(
            "Parsed signature {major}.{minor}: {} entries from {} bytes",
            table.len(),
            data.len()
        );

        Ok(SignaturePickle {
            major,
            minor,
            table,
        })
    }

    /// Renames the namespace `old` to `new` throughout the entry table.
    ///
    /// See [`EntryTable::replace`] for the exact matching rules. Returns the number of
    /// namespace links that resolved to `old`.
    ///
    /// # Errors
    /// Returns [`crate::Error::CyclicReference`] if a namespace link is part of a cycle, and
    /// [`crate::Error::InvalidNamespace`] if either namespace is empty.
    pub fn replace(&mut self, old: &str, new: &str) -> Result<usize> {
        self.table.replace(old, new)
    }

    /// Writes the pickle back to bytes.
    ///
    /// A pickle that went through [`SignaturePickle::parse`] without modification
    /// serializes to its input, minus the optional trailer byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a count, length or index exceeds `u32::MAX`.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        write_nat(self.major, &mut buffer);
        write_nat(self.minor, &mut buffer);
        self.table.write(&mut buffer)?;
        Ok(buffer)
    }

    /// Major version from the header.
    #[must_use]
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor version from the header.
    #[must_use]
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// The entry table.
    #[must_use]
    pub fn table(&self) -> &EntryTable {
        &self.table
    }

    /// Mutable access to the entry table, e.g. to append entries directly.
    pub fn table_mut(&mut self) -> &mut EntryTable {
        &mut self.table
    }

    /// Iterates over the entries in table order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.table.iter()
    }

    /// Every resolvable namespace in the pickle, as `(link_index, dotted_path)`.
    ///
    /// # Errors
    /// Returns [`crate::Error::CyclicReference`] if any namespace link is part of a cycle.
    pub fn namespaces(&self) -> Result<Vec<(usize, String)>> {
        self.table.namespaces()
    }
}

impl fmt::Display for SignaturePickle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Major version: {}", self.major)?;
        writeln!(f, "Minor version: {}", self.minor)?;
        write!(f, "{}", self.table)
    }
}
