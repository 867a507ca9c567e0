//! The entry table of a signature pickle and the namespace rewrite engine.
//!
//! # Rewrite Strategy
//!
//! Entries refer to each other by position, and most kinds are never decoded, so the
//! table cannot know every dependent of a given entry. Renaming a namespace therefore
//! follows two rules:
//!
//! - A namespace link whose resolved path equals the old namespace is the only existing
//!   entry touched by the graph pass, and only its `name_ref` / `parent_ref` fields change.
//!   The replacement name and parent chain are always appended as fresh entries, never
//!   shared with existing ones.
//! - String literals are the single exception: a literal slot is fixed by its wrapper, so
//!   the referenced name entry's text is edited in place.
//!
//! Indices are never removed or renumbered. Links that only depend on a rewritten link
//! (e.g. `com.foo.Widget` when `com.foo` is renamed) follow automatically because
//! resolution always walks the live parent references.

use std::{collections::BTreeSet, fmt};

use crate::{
    file::parser::Parser,
    signature::types::{
        ConstantWrapper, Entry, LiteralKind, NameEntry, NameKind, NamespaceLink, RawEntry,
    },
    utils::{to_u32, write_nat},
    Error, Result,
};

/// Ordered, append-only collection of pickle entries.
///
/// Besides the entries themselves the table keeps the indices of the decoded
/// namespace links and constant wrappers, in table order, so the rewrite passes do not
/// have to scan opaque entries.
#[derive(Clone, Debug, Default)]
pub struct EntryTable {
    entries: Vec<Entry>,
    links: Vec<usize>,
    constants: Vec<usize>,
}

impl EntryTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes and appends an entry read from a pickle, returning its index.
    pub fn add_entry(&mut self, type_code: u8, payload: &[u8]) -> usize {
        self.push(Entry::from_raw(type_code, payload))
    }

    /// Appends an entry, returning its index.
    pub fn push(&mut self, entry: Entry) -> usize {
        let index = self.entries.len();
        match entry {
            Entry::NamespaceLink(_) => self.links.push(index),
            Entry::ConstantWrapper(_) => self.constants.push(index),
            Entry::Raw(_) | Entry::Name(_) => {}
        }
        self.entries.push(entry);
        index
    }

    /// Number of entries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Iterates over all entries in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Returns the term name text at `index`, if that entry is a term name.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        match self.entries.get(index) {
            Some(Entry::Name(NameEntry {
                kind: NameKind::Term,
                text,
            })) => Some(text),
            _ => None,
        }
    }

    /// Returns the namespace link at `index`, if that entry is one.
    #[must_use]
    pub fn link(&self, index: usize) -> Option<&NamespaceLink> {
        match self.entries.get(index) {
            Some(Entry::NamespaceLink(link)) => Some(link),
            _ => None,
        }
    }

    /// Computes the dotted namespace a link encodes.
    ///
    /// Returns `Ok(None)` when a name reference does not point at a term name, or a parent
    /// reference does not point at another namespace link. Such links simply never match
    /// a rename.
    ///
    /// # Errors
    /// Returns [`crate::Error::CyclicReference`] if following parent references does not
    /// reach a root component within as many steps as the table has entries.
    pub fn resolve(&self, link: &NamespaceLink) -> Result<Option<String>> {
        let mut components = Vec::new();
        let mut current = *link;
        let mut steps = 0;

        loop {
            let Some(name) = self.name(current.name_ref) else {
                return Ok(None);
            };
            components.push(name);

            let Some(parent_ref) = current.parent_ref else {
                break;
            };

            steps += 1;
            if steps > self.entries.len() {
                return Err(Error::CyclicReference(parent_ref));
            }

            match self.link(parent_ref) {
                Some(parent) => current = *parent,
                None => return Ok(None),
            }
        }

        components.reverse();
        Ok(Some(components.join(".")))
    }

    /// Resolves every namespace link in the table.
    ///
    /// Returns `(index, path)` pairs in table order, skipping links that do not resolve.
    ///
    /// # Errors
    /// Returns [`crate::Error::CyclicReference`] if any link is part of a cycle.
    pub fn namespaces(&self) -> Result<Vec<(usize, String)>> {
        let mut namespaces = Vec::with_capacity(self.links.len());
        for &index in &self.links {
            if let Some(link) = self.link(index) {
                if let Some(path) = self.resolve(link)? {
                    namespaces.push((index, path));
                }
            }
        }
        Ok(namespaces)
    }

    /// Renames the namespace `old` to `new`.
    ///
    /// Every namespace link that resolves exactly to `old` is rewritten to encode `new`,
    /// and every string literal containing `old` has that text replaced by `new`.
    ///
    /// Returns the number of namespace links whose path equalled `old`. Links that merely
    /// depend on a rewritten link, and rewritten literals, are not counted.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidNamespace`] if either namespace is empty, and
    /// [`crate::Error::CyclicReference`] if a namespace link is part of a cycle.
    /// All links are resolved before anything is modified, so an error leaves the table
    /// untouched.
    pub fn replace(&mut self, old: &str, new: &str) -> Result<usize> {
        if old.is_empty() || new.is_empty() {
            return Err(Error::InvalidNamespace(format!("{old} -> {new}")));
        }

        let mut matched = Vec::new();
        for &index in &self.links {
            if let Some(link) = self.link(index) {
                if self.resolve(link)?.as_deref() == Some(old) {
                    matched.push(index);
                }
            }
        }

        let components: Vec<&str> = new.split('.').collect();
        for &index in &matched {
            self.rewrite_link(index, &components)?;
        }

        let literals = self.replace_literals(old, new);
        log::debug!(
            "Renamed '{old}' to '{new}': {} namespace links, {literals} string literals",
            matched.len()
        );

        Ok(matched.len())
    }

    /// Substring-replaces `old` with `new` inside every string literal's name entry.
    ///
    /// Each name entry is edited at most once, even when several wrappers point at the
    /// same literal. Returns the number of name entries changed.
    fn replace_literals(&mut self, old: &str, new: &str) -> usize {
        let mut targets = BTreeSet::new();
        for &index in &self.constants {
            let Some(Entry::ConstantWrapper(ConstantWrapper { literal_ref, .. })) =
                self.entries.get(index)
            else {
                continue;
            };
            if let Some(name_ref) = self.string_literal_name(*literal_ref) {
                targets.insert(name_ref);
            }
        }

        let mut changed = 0;
        for name_ref in targets {
            if let Some(Entry::Name(name)) = self.entries.get_mut(name_ref) {
                if name.text.contains(old) {
                    name.text = name.text.replace(old, new);
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Index of the name entry holding a string literal's value.
    ///
    /// Other literal kinds are not interpreted and yield `None`.
    fn string_literal_name(&self, literal_ref: usize) -> Option<usize> {
        let Some(Entry::Raw(RawEntry {
            type_code,
            payload,
        })) = self.entries.get(literal_ref)
        else {
            return None;
        };
        if LiteralKind::from_type_code(*type_code) != Some(LiteralKind::String) {
            return None;
        }

        let mut parser = Parser::new(payload);
        let name_ref = parser.read_nat().ok()? as usize;
        match self.entries.get(name_ref) {
            Some(Entry::Name(_)) => Some(name_ref),
            _ => None,
        }
    }

    /// Points the existing link at `index` to a freshly appended name and parent chain.
    fn rewrite_link(&mut self, index: usize, components: &[&str]) -> Result<()> {
        let Some((last, parents)) = components.split_last() else {
            return Err(Error::InvalidNamespace(String::new()));
        };

        let name_ref = self.push(Entry::Name(NameEntry::term(*last)));
        let parent_ref = if parents.is_empty() {
            None
        } else {
            Some(self.add_namespace_chain(parents)?)
        };

        match self.entries.get_mut(index) {
            Some(Entry::NamespaceLink(link)) => {
                link.name_ref = name_ref;
                link.parent_ref = parent_ref;
                Ok(())
            }
            _ => Err(malformed_error!("Entry {} is not a namespace link", index)),
        }
    }

    /// Appends a new chain of name and link entries for `components`, outermost first.
    ///
    /// Returns the index of the link for the last component.
    fn add_namespace_chain(&mut self, components: &[&str]) -> Result<usize> {
        let Some((last, parents)) = components.split_last() else {
            return Err(Error::InvalidNamespace(String::new()));
        };

        let parent_ref = if parents.is_empty() {
            None
        } else {
            Some(self.add_namespace_chain(parents)?)
        };

        let name_ref = self.push(Entry::Name(NameEntry::term(*last)));
        Ok(self.push(Entry::NamespaceLink(NamespaceLink {
            name_ref,
            parent_ref,
        })))
    }

    /// Writes the entry count followed by every entry.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a count, length or index exceeds `u32::MAX`.
    pub fn write(&self, buffer: &mut Vec<u8>) -> Result<()> {
        write_nat(to_u32(self.entries.len())?, buffer);
        for entry in &self.entries {
            entry.write(buffer)?;
        }
        Ok(())
    }
}

impl fmt::Display for EntryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a EntryTable {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
