//! # sigshade Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the sigshade library. Import this module to get quick access to everything needed
//! to parse, rewrite and re-encode signature pickles.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all sigshade operations
pub use crate::Error;

/// The result type used throughout sigshade
pub use crate::Result;

/// Low-level byte cursor
pub use crate::Parser;

// ================================================================================================
// Signature Pickles
// ================================================================================================

/// Pickle container and entry table
pub use crate::signature::{EntryTable, SignaturePickle};

/// Entry model
pub use crate::signature::{
    ConstantWrapper, Entry, LiteralKind, NameEntry, NameKind, NamespaceLink, RawEntry,
    ENTRY_TYPE,
};

// ================================================================================================
// Annotations
// ================================================================================================

/// Annotation text encoding and artifact access
pub use crate::annotation::{
    ArtifactCodec, SevenBitCodec, SignatureAnnotation, TextCodec, MAX_CHUNK_LEN,
};

// ================================================================================================
// Shading
// ================================================================================================

/// Rename rules, configuration and driver
pub use crate::shade::{RenameRule, ShadeConfig, ShadeOutcome, Shader};
