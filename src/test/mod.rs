//! Shared fixtures for unit tests.
//!
//! [`TableBuilder`] assembles entry tables out of `(type_code, payload)` pairs, the same
//! shape a pickle is read in, so fixtures exercise the regular decoding path.

use crate::{
    signature::{EntryTable, LiteralKind, ENTRY_TYPE},
    utils::{encode_nat, write_nat},
};

/// Builds entry tables and pickle bytes one entry at a time.
#[derive(Default)]
pub struct TableBuilder {
    entries: Vec<(u8, Vec<u8>)>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry verbatim, returning its index.
    pub fn raw(&mut self, type_code: u8, payload: &[u8]) -> usize {
        self.entries.push((type_code, payload.to_vec()));
        self.entries.len() - 1
    }

    pub fn term_name(&mut self, text: &str) -> usize {
        self.raw(ENTRY_TYPE::TERM_NAME, text.as_bytes())
    }

    pub fn link(&mut self, name_ref: usize, parent_ref: Option<usize>) -> usize {
        let mut payload = encode_nat(name_ref as u32);
        if let Some(parent_ref) = parent_ref {
            write_nat(parent_ref as u32, &mut payload);
        }
        self.raw(ENTRY_TYPE::EXT_MOD_CLASS_REF, &payload)
    }

    /// Appends a name and a link per component of `path`, outermost first.
    ///
    /// Returns the index of the link for the last component.
    pub fn namespace(&mut self, path: &str) -> usize {
        let mut parent = None;
        for component in path.split('.') {
            let name = self.term_name(component);
            parent = Some(self.link(name, parent));
        }
        parent.unwrap()
    }

    /// Appends a name, a string literal pointing at it, and a constant wrapper for the
    /// literal. Returns `(name_index, literal_index)`.
    pub fn string_constant(&mut self, text: &str) -> (usize, usize) {
        let name = self.term_name(text);
        let literal = self.raw(LiteralKind::String.type_code(), &encode_nat(name as u32));
        self.constant_for(literal);
        (name, literal)
    }

    /// Appends another constant wrapper for an existing literal.
    pub fn constant_for(&mut self, literal: usize) -> usize {
        self.raw(ENTRY_TYPE::CONSTANT_TYPE, &encode_nat(literal as u32))
    }

    pub fn build(&self) -> EntryTable {
        let mut table = EntryTable::new();
        for (type_code, payload) in &self.entries {
            table.add_entry(*type_code, payload);
        }
        table
    }

    /// Serialized version 5.0 pickle holding the entries added so far.
    pub fn pickle(&self) -> Vec<u8> {
        self.pickle_with_version(5, 0)
    }

    pub fn pickle_with_version(&self, major: u32, minor: u32) -> Vec<u8> {
        let mut data = Vec::new();
        write_nat(major, &mut data);
        write_nat(minor, &mut data);
        write_nat(self.entries.len() as u32, &mut data);
        for (type_code, payload) in &self.entries {
            data.push(*type_code);
            write_nat(payload.len() as u32, &mut data);
            data.extend_from_slice(payload);
        }
        data
    }
}
