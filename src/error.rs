use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Format Errors (fatal for the pickle being processed)
/// - [`Error::UnexpectedEndOfData`] - A NAT or payload read ran past the end of the data
/// - [`Error::UnsupportedVersion`] - The pickle header carries a version other than 5.0
/// - [`Error::TrailingData`] - Bytes remain after the entry table and optional trailer
/// - [`Error::CyclicReference`] - A namespace link chain loops back onto itself
/// - [`Error::Malformed`] - Structurally invalid data, e.g. a NAT that overflows `u32`
///
/// ## Input Errors
/// - [`Error::InvalidNamespace`] - A rename rule with an empty namespace or component
/// - [`Error::InvalidEncoding`] - Annotation text that is not a valid 7-bit encoding
///
/// ## External Errors
/// - [`Error::Error`] - Failures reported by an [`crate::annotation::ArtifactCodec`]
///
/// # Examples
///
/// ```rust
/// use sigshade::{Error, SignaturePickle};
///
/// match SignaturePickle::parse(&[0x04, 0x00, 0x00]) {
///     Err(Error::UnsupportedVersion { major, minor }) => {
///         assert_eq!((major, minor), (4, 0));
///     }
///     other => panic!("unexpected result: {:?}", other.map(|_| ())),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The data ended before a complete value could be read.
    ///
    /// Raised by NAT decoding when no terminating byte was found, and by entry
    /// decoding when a declared payload length exceeds the remaining bytes.
    #[error("Unexpected end of signature data")]
    UnexpectedEndOfData,

    /// The pickle header declares a version this library does not understand.
    ///
    /// Only major version 5, minor version 0 is accepted.
    #[error("Unexpected signature version found: {major}.{minor}")]
    UnsupportedVersion {
        /// Major version read from the header
        major: u32,
        /// Minor version read from the header
        minor: u32,
    },

    /// Unconsumed bytes remain after the entry table.
    ///
    /// A single `0x00` trailer byte is tolerated; anything beyond that is reported here.
    #[error("Unexpected additional data at offset {offset} ({remaining} bytes) at end of signature")]
    TrailingData {
        /// Offset of the first unexpected byte
        offset: usize,
        /// Number of bytes left from that offset
        remaining: usize,
    },

    /// Resolving a namespace link revisited an entry already on its own parent chain.
    ///
    /// The associated value is the index of the link at which the walk was abandoned.
    #[error("Cyclic namespace reference starting at entry {0}")]
    CyclicReference(usize),

    /// The data is damaged and could not be parsed.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A namespace used in a rename rule is not a valid dotted path.
    #[error("Invalid namespace - '{0}'")]
    InvalidNamespace(String),

    /// Annotation text could not be decoded back into pickle bytes.
    #[error("Invalid signature encoding - {0}")]
    InvalidEncoding(String),

    /// Generic error for miscellaneous failures.
    ///
    /// Used by [`crate::annotation::ArtifactCodec`] implementations to report
    /// problems reading or rewriting the enclosing artifact.
    #[error("{0}")]
    Error(String),
}
