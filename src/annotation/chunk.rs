//! Splitting annotation text across constant pool strings.

/// Largest chunk length known to be accepted by class file tooling.
///
/// The constant pool limit is 65535 bytes per string, but encoded signatures contain
/// U+0000 characters, which modified UTF-8 stores as two bytes each.
pub const MAX_CHUNK_LEN: usize = 65493;

/// The encoded signature as stored in a class artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureAnnotation {
    /// The whole encoding in one string value
    Single(String),
    /// The encoding split into ordered string values
    Chunked(Vec<String>),
}

impl SignatureAnnotation {
    /// Wraps `encoded` as a single value if it fits into `max_chunk_len` characters, and
    /// as ordered chunks of at most `max_chunk_len` characters otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigshade::annotation::SignatureAnnotation;
    ///
    /// assert_eq!(
    ///     SignatureAnnotation::from_encoded("abcde".into(), 5),
    ///     SignatureAnnotation::Single("abcde".into())
    /// );
    /// assert_eq!(
    ///     SignatureAnnotation::from_encoded("abcdef".into(), 3),
    ///     SignatureAnnotation::Chunked(vec!["abc".into(), "def".into()])
    /// );
    /// ```
    #[must_use]
    pub fn from_encoded(encoded: String, max_chunk_len: usize) -> Self {
        if encoded.chars().count() <= max_chunk_len {
            SignatureAnnotation::Single(encoded)
        } else {
            SignatureAnnotation::Chunked(split_chunks(&encoded, max_chunk_len))
        }
    }

    /// The complete encoded text, with chunks concatenated in order.
    #[must_use]
    pub fn encoded(&self) -> String {
        match self {
            SignatureAnnotation::Single(text) => text.clone(),
            SignatureAnnotation::Chunked(chunks) => chunks.concat(),
        }
    }

    /// Returns `true` for the chunked annotation kind.
    #[must_use]
    pub fn is_chunked(&self) -> bool {
        matches!(self, SignatureAnnotation::Chunked(_))
    }
}

/// Splits `encoded` into consecutive chunks of `max_chunk_len` characters.
///
/// Only the last chunk may be shorter, and it is never empty. An empty input yields a
/// single empty chunk. A `max_chunk_len` of zero is treated as one.
#[must_use]
pub fn split_chunks(encoded: &str, max_chunk_len: usize) -> Vec<String> {
    let max_chunk_len = max_chunk_len.max(1);
    if encoded.is_empty() {
        return vec![String::new()];
    }

    let mut chunks = Vec::new();
    let mut current = String::with_capacity(max_chunk_len.min(encoded.len()));
    let mut count = 0;
    for c in encoded.chars() {
        if count == max_chunk_len {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(c);
        count += 1;
    }
    chunks.push(current);

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_exact_multiple() {
        let chunks = split_chunks("aaabbbccc", 3);
        assert_eq!(chunks, ["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn test_split_remainder() {
        let chunks = split_chunks("aaabbbc", 3);
        assert_eq!(chunks, ["aaa", "bbb", "c"]);
        assert_eq!(split_chunks("", 3), [""]);
        assert_eq!(split_chunks("ab", 0), ["a", "b"]);
    }

    #[test]
    fn test_from_encoded_boundary() {
        let text = "x".repeat(MAX_CHUNK_LEN);
        let single = SignatureAnnotation::from_encoded(text.clone(), MAX_CHUNK_LEN);
        assert!(!single.is_chunked());
        assert_eq!(single.encoded(), text);

        let text = "x".repeat(2 * MAX_CHUNK_LEN);
        let chunked = SignatureAnnotation::from_encoded(text.clone(), MAX_CHUNK_LEN);
        match &chunked {
            SignatureAnnotation::Chunked(chunks) => {
                assert_eq!(chunks.len(), 2);
                assert!(chunks.iter().all(|c| c.len() == MAX_CHUNK_LEN));
            }
            SignatureAnnotation::Single(_) => panic!("expected chunks"),
        }
        assert_eq!(chunked.encoded(), text);

        let chunked =
            SignatureAnnotation::from_encoded("x".repeat(MAX_CHUNK_LEN + 1), MAX_CHUNK_LEN);
        assert_eq!(
            chunked,
            SignatureAnnotation::Chunked(vec!["x".repeat(MAX_CHUNK_LEN), "x".into()])
        );
    }
}
