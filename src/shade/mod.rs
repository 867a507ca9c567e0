//! Applying rename rules to signature pickles and to the class artifacts carrying them.
//!
//! [`Shader`] ties the pieces of this crate together: it pulls the signature annotation out
//! of an artifact, decodes and parses the pickle, applies every [`RenameRule`] of its
//! [`ShadeConfig`], and writes the result back the same way.
//!
//! Each artifact holds an independent pickle, so batches are processed in parallel with
//! [`rayon`], one artifact per task. A failure only affects the artifact it occurred in.
//!
//! # Examples
//!
//! ```rust
//! use sigshade::shade::{RenameRule, ShadeConfig, Shader};
//! use sigshade::annotation::{ArtifactCodec, SignatureAnnotation};
//!
//! struct NoSignature;
//!
//! impl ArtifactCodec for NoSignature {
//!     fn extract(&self, _: &[u8]) -> sigshade::Result<Option<SignatureAnnotation>> {
//!         Ok(None)
//!     }
//!     fn inject(&self, artifact: &[u8], _: &SignatureAnnotation) -> sigshade::Result<Vec<u8>> {
//!         Ok(artifact.to_vec())
//!     }
//! }
//!
//! let config = ShadeConfig::default().with_rule(RenameRule::new("com.foo", "shaded.foo")?);
//! let shader = Shader::new(config, NoSignature);
//!
//! let outcome = shader.shade_artifact(b"not a class")?;
//! assert!(!outcome.signature_found);
//! assert_eq!(outcome.bytes, b"not a class");
//! # Ok::<(), sigshade::Error>(())
//! ```

mod config;

pub use config::{RenameRule, ShadeConfig};

use rayon::prelude::*;

use crate::{
    annotation::{ArtifactCodec, SevenBitCodec, SignatureAnnotation, TextCodec},
    signature::SignaturePickle,
    Result,
};

/// Result of shading a single artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadeOutcome {
    /// The artifact bytes, rewritten if `modified` is set and unchanged otherwise
    pub bytes: Vec<u8>,
    /// Number of namespace links rewritten, summed over all rules
    pub rewrites: usize,
    /// Whether the artifact carried a signature annotation at all
    pub signature_found: bool,
    /// Whether the signature changed and was written back
    pub modified: bool,
}

impl ShadeOutcome {
    fn unchanged(artifact: &[u8], signature_found: bool) -> Self {
        ShadeOutcome {
            bytes: artifact.to_vec(),
            rewrites: 0,
            signature_found,
            modified: false,
        }
    }
}

/// Applies a [`ShadeConfig`] to pickles and class artifacts.
pub struct Shader<A: ArtifactCodec, T: TextCodec = SevenBitCodec> {
    config: ShadeConfig,
    artifact_codec: A,
    text_codec: T,
}

impl<A: ArtifactCodec> Shader<A, SevenBitCodec> {
    /// Creates a shader using the standard 7-bit annotation encoding.
    pub fn new(config: ShadeConfig, artifact_codec: A) -> Self {
        Self::with_text_codec(config, artifact_codec, SevenBitCodec)
    }
}

impl<A: ArtifactCodec, T: TextCodec> Shader<A, T> {
    /// Creates a shader with a custom annotation text encoding.
    pub fn with_text_codec(config: ShadeConfig, artifact_codec: A, text_codec: T) -> Self {
        Shader {
            config,
            artifact_codec,
            text_codec,
        }
    }

    /// The configuration this shader applies.
    #[must_use]
    pub fn config(&self) -> &ShadeConfig {
        &self.config
    }

    /// Applies every rule, in order, to `pickle`.
    ///
    /// Returns the number of namespace links rewritten over all rules.
    ///
    /// # Errors
    /// Returns [`crate::Error::CyclicReference`] if the pickle contains a cyclic namespace.
    /// Rules applied before the failing one stay applied.
    pub fn shade_pickle(&self, pickle: &mut SignaturePickle) -> Result<usize> {
        let mut rewrites = 0;
        for rule in &self.config.rules {
            let count = pickle.replace(rule.from(), rule.to())?;
            log::debug!("Rule {rule}: {count} namespace links rewritten");
            rewrites += count;
        }
        Ok(rewrites)
    }

    /// Parses `data` as a pickle, applies every rule and serializes the result.
    ///
    /// Returns the new pickle bytes and the number of namespace links rewritten.
    ///
    /// # Errors
    /// Returns any error from [`SignaturePickle::parse`], [`Shader::shade_pickle`] or
    /// [`SignaturePickle::serialize`].
    pub fn shade_signature(&self, data: &[u8]) -> Result<(Vec<u8>, usize)> {
        let mut pickle = SignaturePickle::parse(data)?;
        let rewrites = self.shade_pickle(&mut pickle)?;
        Ok((pickle.serialize()?, rewrites))
    }

    /// Shades the signature annotation of a class artifact.
    ///
    /// Artifacts without a signature annotation, and artifacts whose signature is not
    /// changed by any rule, are returned unchanged.
    ///
    /// # Errors
    /// Returns errors from the [`ArtifactCodec`], the [`TextCodec`], or any step of
    /// [`Shader::shade_signature`].
    pub fn shade_artifact(&self, artifact: &[u8]) -> Result<ShadeOutcome> {
        let Some(annotation) = self.artifact_codec.extract(artifact)? else {
            return Ok(ShadeOutcome::unchanged(artifact, false));
        };

        let data = self.text_codec.decode(&annotation.encoded())?;
        let (shaded, rewrites) = self.shade_signature(&data)?;

        // The decoded form may carry one padding byte that serialization drops
        let unchanged = data == shaded
            || data
                .strip_suffix(&[0])
                .is_some_and(|d| d == shaded.as_slice());
        if unchanged {
            return Ok(ShadeOutcome::unchanged(artifact, true));
        }

        let encoded = self.text_codec.encode(&shaded);
        let annotation = SignatureAnnotation::from_encoded(encoded, self.config.max_chunk_len);
        let bytes = self.artifact_codec.inject(artifact, &annotation)?;

        log::debug!(
            "Shaded signature: {rewrites} namespace links, {} -> {} bytes",
            data.len(),
            shaded.len()
        );

        Ok(ShadeOutcome {
            bytes,
            rewrites,
            signature_found: true,
            modified: true,
        })
    }

    /// Shades a batch of artifacts in parallel.
    ///
    /// Results are returned in input order; an error in one artifact does not affect the
    /// others.
    pub fn shade_all(&self, artifacts: &[Vec<u8>]) -> Vec<Result<ShadeOutcome>> {
        artifacts
            .par_iter()
            .enumerate()
            .map(|(index, artifact)| {
                let result = self.shade_artifact(artifact);
                if let Err(error) = &result {
                    log::warn!("Failed to shade artifact {index}: {error}");
                }
                result
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test::TableBuilder, Error};

    struct Unused;

    impl ArtifactCodec for Unused {
        fn extract(&self, _: &[u8]) -> Result<Option<SignatureAnnotation>> {
            Err(Error::Error("unused".into()))
        }

        fn inject(&self, _: &[u8], _: &SignatureAnnotation) -> Result<Vec<u8>> {
            Err(Error::Error("unused".into()))
        }
    }

    fn shader(rules: &[(&str, &str)]) -> Shader<Unused> {
        let config = rules.iter().fold(ShadeConfig::default(), |config, (from, to)| {
            config.with_rule(RenameRule::new(*from, *to).unwrap())
        });
        Shader::new(config, Unused)
    }

    #[test]
    fn test_rules_applied_in_order() {
        let mut builder = TableBuilder::new();
        let foo = builder.namespace("com.foo");
        let mut pickle = SignaturePickle::parse(&builder.pickle()).unwrap();

        let shader = shader(&[("com.foo", "org.foo"), ("org.foo", "net.foo")]);
        assert_eq!(shader.shade_pickle(&mut pickle).unwrap(), 2);

        let table = pickle.table();
        let link = table.link(foo).unwrap();
        assert_eq!(table.resolve(link).unwrap().as_deref(), Some("net.foo"));
    }

    #[test]
    fn test_shade_signature() {
        let mut builder = TableBuilder::new();
        builder.namespace("com.foo.Widget");
        builder.namespace("com.other");

        let shader = shader(&[("com.foo", "shaded.com.foo")]);
        let (data, rewrites) = shader.shade_signature(&builder.pickle()).unwrap();
        assert_eq!(rewrites, 1);

        let pickle = SignaturePickle::parse(&data).unwrap();
        let paths: Vec<String> = pickle
            .namespaces()
            .unwrap()
            .into_iter()
            .map(|(_, path)| path)
            .collect();
        assert!(paths.contains(&"shaded.com.foo.Widget".to_string()));
        assert!(paths.contains(&"com.other".to_string()));
        assert!(!paths.contains(&"com.foo".to_string()));
    }

    #[test]
    fn test_shade_signature_errors() {
        let shader = shader(&[("com", "org")]);
        assert!(matches!(
            shader.shade_signature(&[0x04, 0x00, 0x00]),
            Err(Error::UnsupportedVersion { major: 4, minor: 0 })
        ));
    }

    #[test]
    fn test_extract_error_propagates() {
        let shader = shader(&[]);
        assert!(matches!(shader.shade_artifact(b""), Err(Error::Error(_))));

        let results = shader.shade_all(&[Vec::new(), vec![1, 2, 3]]);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_err()));
    }
}
