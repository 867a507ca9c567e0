//! Rename rules and shading configuration

use std::{fmt, str::FromStr};

use crate::{annotation::MAX_CHUNK_LEN, Error, Result};

/// A single namespace rename, `from` to `to`.
///
/// Both sides are dotted paths with non-empty components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenameRule {
    from: String,
    to: String,
}

impl RenameRule {
    /// Creates a validated rename rule.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidNamespace`] if either side is empty or contains an
    /// empty component, e.g. `"com..foo"` or `".com"`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigshade::shade::RenameRule;
    ///
    /// let rule = RenameRule::new("com.foo", "shaded.com.foo")?;
    /// assert_eq!(rule.from(), "com.foo");
    /// assert!(RenameRule::new("com.", "org").is_err());
    /// # Ok::<(), sigshade::Error>(())
    /// ```
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Result<Self> {
        let from = from.into();
        let to = to.into();
        validate_namespace(&from)?;
        validate_namespace(&to)?;
        Ok(RenameRule { from, to })
    }

    /// The namespace being renamed.
    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    /// The replacement namespace.
    #[must_use]
    pub fn to(&self) -> &str {
        &self.to
    }
}

fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() || namespace.split('.').any(str::is_empty) {
        return Err(Error::InvalidNamespace(namespace.to_string()));
    }
    Ok(())
}

/// Parses `"from=to"`.
impl FromStr for RenameRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((from, to)) = s.split_once('=') else {
            return Err(Error::InvalidNamespace(s.to_string()));
        };
        RenameRule::new(from.trim(), to.trim())
    }
}

impl fmt::Display for RenameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.from, self.to)
    }
}

/// Configuration for a [`crate::shade::Shader`].
///
/// Rules are applied to every pickle in the order they were added, each one seeing the
/// result of the previous ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadeConfig {
    /// Rename rules, applied in order
    pub rules: Vec<RenameRule>,

    /// Maximum characters per annotation string before the encoding is chunked
    /// (default: [`MAX_CHUNK_LEN`])
    pub max_chunk_len: usize,
}

impl Default for ShadeConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            max_chunk_len: MAX_CHUNK_LEN,
        }
    }
}

impl ShadeConfig {
    /// Appends a rename rule.
    #[must_use]
    pub fn with_rule(mut self, rule: RenameRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Sets the chunk length limit; values below one are raised to one.
    #[must_use]
    pub fn with_max_chunk_len(mut self, max_chunk_len: usize) -> Self {
        self.max_chunk_len = max_chunk_len.max(1);
        self
    }
}
