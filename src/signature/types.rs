use std::fmt;

use strum::{EnumCount, EnumIter};

use crate::{
    file::parser::Parser,
    utils::{nat_size, to_u32, write_nat},
    Result,
};

#[allow(non_snake_case, dead_code, missing_docs)]
/// Entry type codes inside a signature pickle that this crate interprets
pub mod ENTRY_TYPE {
    // UTF-8 term name
    pub const TERM_NAME: u8 = 1;
    // UTF-8 type name
    pub const TYPE_NAME: u8 = 2;
    // name_Ref [owner_Ref] - one component of a dotted namespace
    pub const EXT_MOD_CLASS_REF: u8 = 10;
    // constant_Ref {...}
    pub const CONSTANT_TYPE: u8 = 15;
    // First and last literal kinds, see `LiteralKind`
    pub const LITERAL_FIRST: u8 = 24;
    pub const LITERAL_LAST: u8 = 36;
}

/// The literal entry kinds a [`ConstantWrapper`] may point at.
///
/// Only [`LiteralKind::String`] is interpreted when rewriting; every other kind is left
/// untouched, so a namespace spelled inside e.g. a class literal is not relocated.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, EnumIter, EnumCount)]
pub enum LiteralKind {
    /// `()`
    Unit = 24,
    /// `true` / `false`
    Boolean = 25,
    /// 8-bit integer
    Byte = 26,
    /// 16-bit integer
    Short = 27,
    /// UTF-16 code unit
    Char = 28,
    /// 32-bit integer
    Int = 29,
    /// 64-bit integer
    Long = 30,
    /// 32-bit float
    Float = 31,
    /// 64-bit float
    Double = 32,
    /// Reference to a name entry holding the string value
    String = 33,
    /// `null`
    Null = 34,
    /// Reference to a type
    Class = 35,
    /// Reference to an enum symbol
    Enum = 36,
}

impl LiteralKind {
    /// Maps an entry type code onto a literal kind, `None` for non-literal codes.
    #[must_use]
    pub fn from_type_code(type_code: u8) -> Option<LiteralKind> {
        let kind = match type_code {
            24 => LiteralKind::Unit,
            25 => LiteralKind::Boolean,
            26 => LiteralKind::Byte,
            27 => LiteralKind::Short,
            28 => LiteralKind::Char,
            29 => LiteralKind::Int,
            30 => LiteralKind::Long,
            31 => LiteralKind::Float,
            32 => LiteralKind::Double,
            33 => LiteralKind::String,
            34 => LiteralKind::Null,
            35 => LiteralKind::Class,
            36 => LiteralKind::Enum,
            _ => return None,
        };
        Some(kind)
    }

    /// The entry type code of this literal kind.
    #[must_use]
    pub fn type_code(self) -> u8 {
        self as u8
    }
}

/// Distinguishes the two name entry kinds, which share the same UTF-8 encoding.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum NameKind {
    /// Term name, used for namespace components and string literal values
    Term,
    /// Type name
    Type,
}

impl NameKind {
    /// The entry type code of this name kind.
    #[must_use]
    pub fn type_code(self) -> u8 {
        match self {
            NameKind::Term => ENTRY_TYPE::TERM_NAME,
            NameKind::Type => ENTRY_TYPE::TYPE_NAME,
        }
    }
}

/// An entry kept as its original type code and payload bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEntry {
    /// Entry type code
    pub type_code: u8,
    /// Payload exactly as read from the pickle
    pub payload: Vec<u8>,
}

/// A UTF-8 name entry.
///
/// The payload is re-derived from `text` on write, so changing the text changes the entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameEntry {
    /// Term or type name
    pub kind: NameKind,
    /// Decoded text
    pub text: String,
}

impl NameEntry {
    /// Creates a term name entry.
    pub fn term(text: impl Into<String>) -> Self {
        NameEntry {
            kind: NameKind::Term,
            text: text.into(),
        }
    }

    /// Decodes a name payload.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the payload is not valid UTF-8.
    pub fn decode(kind: NameKind, payload: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| malformed_error!("Invalid UTF-8 in name entry - {}", e))?;
        Ok(NameEntry {
            kind,
            text: text.to_string(),
        })
    }
}

/// One component of a dotted namespace.
///
/// `name_ref` points at a term name entry. `parent_ref`, when present, points at the
/// namespace link of the enclosing namespace; a link without parent is a root component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamespaceLink {
    /// Index of the name entry for this component
    pub name_ref: usize,
    /// Index of the enclosing namespace link, if any
    pub parent_ref: Option<usize>,
}

impl NamespaceLink {
    /// Decodes a namespace link payload: `name_Ref [owner_Ref]`.
    ///
    /// The payload must be in canonical form, so that writing the decoded link reproduces
    /// it byte for byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedEndOfData`] for a truncated NAT and
    /// [`crate::Error::Malformed`] for trailing or non-minimally encoded data.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut parser = Parser::new(payload);
        let name_ref = parser.read_nat()? as usize;
        let parent_ref = if parser.has_more_data() {
            Some(parser.read_nat()? as usize)
        } else {
            None
        };

        if parser.has_more_data() {
            return Err(malformed_error!(
                "Namespace link has {} trailing bytes",
                parser.remaining()
            ));
        }

        let link = NamespaceLink {
            name_ref,
            parent_ref,
        };
        if link.payload_len()? != payload.len() {
            return Err(malformed_error!("Namespace link uses a non-minimal NAT encoding"));
        }

        Ok(link)
    }

    fn payload_len(&self) -> Result<usize> {
        let mut len = nat_size(to_u32(self.name_ref)?);
        if let Some(parent_ref) = self.parent_ref {
            len += nat_size(to_u32(parent_ref)?);
        }
        Ok(len)
    }

    fn write(&self, buffer: &mut Vec<u8>) -> Result<()> {
        let name_ref = to_u32(self.name_ref)?;
        match self.parent_ref {
            Some(parent_ref) => {
                let parent_ref = to_u32(parent_ref)?;
                write_nat(to_u32(nat_size(name_ref) + nat_size(parent_ref))?, buffer);
                write_nat(name_ref, buffer);
                write_nat(parent_ref, buffer);
            }
            None => {
                write_nat(to_u32(nat_size(name_ref))?, buffer);
                write_nat(name_ref, buffer);
            }
        }
        Ok(())
    }
}

/// A constant type entry wrapping a reference to a literal entry.
///
/// Only the leading `literal_ref` is decoded; the full payload is kept and written back
/// unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstantWrapper {
    /// Index of the wrapped literal entry
    pub literal_ref: usize,
    /// Payload exactly as read from the pickle
    pub payload: Vec<u8>,
}

impl ConstantWrapper {
    /// Decodes a constant wrapper payload.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnexpectedEndOfData`] if the payload holds no complete NAT.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut parser = Parser::new(payload);
        let literal_ref = parser.read_nat()? as usize;
        Ok(ConstantWrapper {
            literal_ref,
            payload: payload.to_vec(),
        })
    }
}

/// A single record of a signature pickle's entry table.
///
/// Entries are addressed by their position in the table. Kinds that namespace rewriting
/// does not need are kept as [`Entry::Raw`] and written back verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    /// Opaque entry of any other kind
    Raw(RawEntry),
    /// Term or type name
    Name(NameEntry),
    /// Namespace component with optional parent
    NamespaceLink(NamespaceLink),
    /// Wrapper around a literal reference
    ConstantWrapper(ConstantWrapper),
}

impl Entry {
    /// Builds an entry from its type code and payload, decoding the kinds this crate
    /// interprets.
    ///
    /// A recognized kind whose payload cannot be decoded is kept as [`Entry::Raw`] so the
    /// pickle still round-trips.
    #[must_use]
    pub fn from_raw(type_code: u8, payload: &[u8]) -> Entry {
        let decoded = match type_code {
            ENTRY_TYPE::TERM_NAME => NameEntry::decode(NameKind::Term, payload).map(Entry::Name),
            ENTRY_TYPE::TYPE_NAME => NameEntry::decode(NameKind::Type, payload).map(Entry::Name),
            ENTRY_TYPE::EXT_MOD_CLASS_REF => {
                NamespaceLink::decode(payload).map(Entry::NamespaceLink)
            }
            ENTRY_TYPE::CONSTANT_TYPE => {
                ConstantWrapper::decode(payload).map(Entry::ConstantWrapper)
            }
            _ => return Entry::raw(type_code, payload),
        };

        match decoded {
            Ok(entry) => entry,
            Err(error) => {
                log::warn!("Keeping entry of type {type_code} undecoded: {error}");
                Entry::raw(type_code, payload)
            }
        }
    }

    fn raw(type_code: u8, payload: &[u8]) -> Entry {
        Entry::Raw(RawEntry {
            type_code,
            payload: payload.to_vec(),
        })
    }

    /// The entry type code written in front of this entry.
    #[must_use]
    pub fn type_code(&self) -> u8 {
        match self {
            Entry::Raw(raw) => raw.type_code,
            Entry::Name(name) => name.kind.type_code(),
            Entry::NamespaceLink(_) => ENTRY_TYPE::EXT_MOD_CLASS_REF,
            Entry::ConstantWrapper(_) => ENTRY_TYPE::CONSTANT_TYPE,
        }
    }

    /// Writes `[type_code][NAT length][payload]` to `buffer`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a length or index does not fit a NAT.
    pub fn write(&self, buffer: &mut Vec<u8>) -> Result<()> {
        buffer.push(self.type_code());
        match self {
            Entry::Raw(RawEntry { payload, .. })
            | Entry::ConstantWrapper(ConstantWrapper { payload, .. }) => {
                write_nat(to_u32(payload.len())?, buffer);
                buffer.extend_from_slice(payload);
            }
            Entry::Name(name) => {
                let bytes = name.text.as_bytes();
                write_nat(to_u32(bytes.len())?, buffer);
                buffer.extend_from_slice(bytes);
            }
            Entry::NamespaceLink(link) => link.write(buffer)?,
        }
        Ok(())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Raw(raw) => {
                write!(f, "Type={} Raw=", raw.type_code)?;
                for &byte in raw.payload.iter().take(64) {
                    if byte > 32 && byte < 127 {
                        write!(f, "{}", char::from(byte))?;
                    } else {
                        f.write_str(".")?;
                    }
                }
                Ok(())
            }
            Entry::Name(name) => match name.kind {
                NameKind::Term => write!(f, "Type=termName name={}", name.text),
                NameKind::Type => write!(f, "Type=typeName name={}", name.text),
            },
            Entry::NamespaceLink(link) => match link.parent_ref {
                Some(parent) => write!(
                    f,
                    "Type=extModClassRef nameRef={} parentRef={}",
                    link.name_ref, parent
                ),
                None => write!(f, "Type=extModClassRef nameRef={}", link.name_ref),
            },
            Entry::ConstantWrapper(wrapper) => {
                write!(f, "Type=constantType literalRef={}", wrapper.literal_ref)
            }
        }
    }
}
