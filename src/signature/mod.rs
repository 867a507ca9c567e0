//! Signature pickle decoding, namespace rewriting and re-encoding.
//!
//! A signature pickle is a compact binary table of entries that describes the symbols of a
//! compiled class. Entries refer to each other by position. Namespaces are spelled as chains
//! of namespace link entries, each pointing at a name entry for one component and optionally
//! at the link of the enclosing namespace.
//!
//! Only the entry kinds needed to locate and rewrite namespaces are decoded:
//!
//! - **Names** (`1`, `2`) - UTF-8 text
//! - **Namespace links** (`10`) - `name_Ref [owner_Ref]`
//! - **Constant wrappers** (`15`) - a reference to a literal entry, followed by data kept as is
//!
//! Every other entry, and any recognized entry whose payload is not in canonical form, is
//! kept as raw bytes and written back unchanged.
//!
//! # Key Components
//!
//! - [`SignaturePickle`] - Version header and entry table; `parse` / `replace` / `serialize`
//! - [`EntryTable`] - Append-only entry storage, namespace resolution and rewriting
//! - [`Entry`] - A single decoded or raw entry
//!
//! # Examples
//!
//! ```rust
//! use sigshade::signature::{Entry, EntryTable, NameEntry, NamespaceLink};
//!
//! let mut table = EntryTable::new();
//! let com = table.push(Entry::Name(NameEntry::term("com")));
//! let com_link = table.push(Entry::NamespaceLink(NamespaceLink { name_ref: com, parent_ref: None }));
//! let foo = table.push(Entry::Name(NameEntry::term("foo")));
//! let foo_link = table.push(Entry::NamespaceLink(NamespaceLink {
//!     name_ref: foo,
//!     parent_ref: Some(com_link),
//! }));
//!
//! assert_eq!(table.replace("com.foo", "org.bar")?, 1);
//! let link = table.link(foo_link).unwrap();
//! assert_eq!(table.resolve(link)?.as_deref(), Some("org.bar"));
//! # Ok::<(), sigshade::Error>(())
//! ```

mod pickle;
mod table;
mod types;

pub use pickle::SignaturePickle;
pub use table::EntryTable;
pub use types::{
    ConstantWrapper, Entry, LiteralKind, NameEntry, NameKind, NamespaceLink, RawEntry,
    ENTRY_TYPE,
};
