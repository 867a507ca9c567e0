// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # sigshade
//!
//! Namespace relocation ("shading") for the pickled signatures embedded in compiled Scala
//! class files.
//!
//! Bytecode shading tools rename packages inside class files, but the compiler also stores
//! a binary description of every class in a signature annotation. If that pickle keeps the
//! old namespaces, reflection and the compiler itself see classes that no longer exist.
//! `sigshade` decodes the pickle, rewrites the namespaces it spells, and encodes it again
//! without touching anything it does not understand.
//!
//! ## Features
//!
//! - **Lossless round trip** - Entries that are not needed for renaming are kept as raw bytes
//! - **Exact matching** - Only namespaces that equal the renamed path are rewritten;
//!   `com.foobar` is untouched by a rule for `com.foo`
//! - **String literals** - Namespaces spelled inside string constants are rewritten as well
//! - **Batch processing** - Independent class artifacts are shaded in parallel
//!
//! ## Quick Start
//!
//! ```rust
//! use sigshade::prelude::*;
//!
//! // version 5.0, term names "com" and "foo", "foo" nested in "com"
//! let data = [
//!     0x05, 0x00, 0x04,
//!     0x01, 0x03, b'c', b'o', b'm',
//!     0x0A, 0x01, 0x00,
//!     0x01, 0x03, b'f', b'o', b'o',
//!     0x0A, 0x02, 0x02, 0x01,
//! ];
//!
//! let mut pickle = SignaturePickle::parse(&data)?;
//! assert_eq!(pickle.replace("com.foo", "shaded.foo")?, 1);
//!
//! let shaded = SignaturePickle::parse(&pickle.serialize()?)?;
//! let link = shaded.table().link(3).unwrap();
//! assert_eq!(shaded.table().resolve(link)?.as_deref(), Some("shaded.foo"));
//! # Ok::<(), sigshade::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`signature`] - Pickle framing, entry decoding and the namespace rewrite engine
//! - [`annotation`] - Text encoding and chunking of the annotation carrying the pickle
//! - [`shade`] - Rename rules and the batch driver over class artifacts
//! - [`utils`] - NAT encoding helpers
//! - [`Parser`] - Bounded byte cursor used for all decoding
//! - [`Error`] and [`Result`] - Error handling
//!
//! Reading and writing class files is not part of this crate; callers plug their class file
//! library in through [`annotation::ArtifactCodec`].
//!
//! ## Logging
//!
//! Diagnostics are emitted through the [`log`] facade. Entries that could not be decoded are
//! reported at `warn`, rewrite counts at `debug` and parse statistics at `trace`. No logger is
//! installed by this crate.

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use sigshade::prelude::*;
///
/// let rule: RenameRule = "com.foo=shaded.com.foo".parse()?;
/// let shader = Shader::new(ShadeConfig::default().with_rule(rule), NoArtifacts);
/// # struct NoArtifacts;
/// # impl ArtifactCodec for NoArtifacts {
/// #     fn extract(&self, _: &[u8]) -> Result<Option<SignatureAnnotation>> { Ok(None) }
/// #     fn inject(&self, a: &[u8], _: &SignatureAnnotation) -> Result<Vec<u8>> { Ok(a.to_vec()) }
/// # }
/// assert_eq!(shader.config().rules.len(), 1);
/// # Ok::<(), sigshade::Error>(())
/// ```
pub mod prelude;

/// Signature pickle decoding, namespace rewriting and re-encoding.
pub mod signature;

/// Conversion between pickle bytes and the annotation text stored in class artifacts.
pub mod annotation;

/// Rename rules and the driver applying them to pickles and artifacts.
pub mod shade;

/// NAT encoding and integer conversion helpers.
pub mod utils;

/// `sigshade` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `sigshade` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use sigshade::{Error, SignaturePickle};
///
/// match SignaturePickle::parse(&[0x05, 0x00, 0x01]) {
///     Ok(_) => println!("Parsed"),
///     Err(Error::UnexpectedEndOfData) => println!("Truncated pickle"),
///     Err(Error::UnsupportedVersion { major, minor }) => println!("Version {major}.{minor}"),
///     Err(e) => println!("Error: {e}"),
/// }
/// ```
pub use error::Error;

/// Low-level byte cursor used to decode pickles.
pub use file::Parser;

/// Main entry point for working with signature pickles.
pub use signature::{EntryTable, SignaturePickle};
