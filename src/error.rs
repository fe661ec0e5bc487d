//! Codex verification errors

use displaydoc::Display;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Error {
    /// Cannot build a Merkle root over zero documents
    EmptyInput,
    /// Document source {source_ref} is unavailable: {reason}
    SourceUnavailable { source_ref: String, reason: String },
    /// Document from {source_ref} is not valid UTF-8: {reason}
    Encoding { source_ref: String, reason: String },
    /// Invalid digest: {0}
    InvalidDigest(String),
    /// Invalid configuration: {0}
    Config(String),
}

impl std::error::Error for Error {}
