//! Codex documents ("laws")

use crate::error::Error;
use std::fmt;

/// A single law of the codex.
///
/// Ordering is byte-wise lexicographic over the UTF-8 text, which is the
/// order leaves are derived in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Document(String);

impl Document {
    /// Wrap already decoded text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Build a document from raw bytes, rejecting anything that is not UTF-8
    pub fn from_utf8(bytes: Vec<u8>, source_ref: &str) -> Result<Self, Error> {
        String::from_utf8(bytes)
            .map(Self)
            .map_err(|e| Error::Encoding {
                source_ref: source_ref.to_string(),
                reason: e.to_string(),
            })
    }

    /// The law's text
    pub fn text(&self) -> &str {
        &self.0
    }

    /// UTF-8 bytes hashed into the leaf
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
