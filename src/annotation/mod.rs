//! The boundary between signature pickles and the class artifacts that carry them.
//!
//! A compiled class stores its signature pickle as the string value of an annotation. Getting
//! from the artifact to pickle bytes and back takes three steps, each behind its own type:
//!
//! 1. [`ArtifactCodec::extract`] finds the annotation and returns its [`SignatureAnnotation`]
//! 2. [`TextCodec::decode`] turns the concatenated annotation text into pickle bytes
//! 3. after rewriting, [`TextCodec::encode`], [`SignatureAnnotation::from_encoded`] and
//!    [`ArtifactCodec::inject`] reverse the process
//!
//! Reading and writing the class file format itself is left to the caller, who provides an
//! [`ArtifactCodec`] implementation. The text encoding is provided by [`SevenBitCodec`].

mod chunk;
mod codec;

pub use chunk::{split_chunks, SignatureAnnotation, MAX_CHUNK_LEN};
pub use codec::{SevenBitCodec, TextCodec};

use crate::Result;

/// Locates and replaces the signature annotation inside a class artifact.
///
/// Implementations must be thread-safe, since [`crate::shade::Shader::shade_all`] shares a
/// single codec between worker threads.
///
/// # Examples
///
/// ```rust
/// use sigshade::annotation::{ArtifactCodec, SignatureAnnotation};
///
/// /// An "artifact" that is nothing but the annotation text itself.
/// struct PlainText;
///
/// impl ArtifactCodec for PlainText {
///     fn extract(&self, artifact: &[u8]) -> sigshade::Result<Option<SignatureAnnotation>> {
///         let text = std::str::from_utf8(artifact)
///             .map_err(|e| sigshade::Error::Error(e.to_string()))?;
///         Ok(Some(SignatureAnnotation::Single(text.to_string())))
///     }
///
///     fn inject(&self, _artifact: &[u8], annotation: &SignatureAnnotation) -> sigshade::Result<Vec<u8>> {
///         Ok(annotation.encoded().into_bytes())
///     }
/// }
/// ```
pub trait ArtifactCodec: Send + Sync {
    /// Returns the signature annotation of `artifact`, or `None` if it carries none.
    ///
    /// # Errors
    /// Returns an error if the artifact cannot be read or the annotation is malformed.
    fn extract(&self, artifact: &[u8]) -> Result<Option<SignatureAnnotation>>;

    /// Returns a copy of `artifact` with its signature annotation replaced by `annotation`.
    ///
    /// # Errors
    /// Returns an error if the artifact cannot be rewritten.
    fn inject(&self, artifact: &[u8], annotation: &SignatureAnnotation) -> Result<Vec<u8>>;
}
