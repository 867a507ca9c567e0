//! Byte-level access to decoded signature data.
//!
//! Signature pickles reach this crate as plain byte buffers, already extracted from their
//! class artifact and decoded from annotation text. This module provides the bounded cursor
//! used to walk those buffers.
//!
//! # Key Components
//!
//! - [`crate::file::parser::Parser`] - Cursor with NAT decoding and bounds-checked slicing
//!
//! # Error Handling
//!
//! All reads return [`crate::Result`]; reading past the end of the buffer yields
//! [`crate::Error::UnexpectedEndOfData`].

pub mod parser;

pub use parser::Parser;
