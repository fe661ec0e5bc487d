//! Attestation of a verified root for an epoch

use crate::hash::Root;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a verification period, e.g. `EPOCH_2025-10-15-154540`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochId(String);

impl EpochId {
    /// Wrap an epoch tag as given, without validation
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw epoch tag
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EpochId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EpochId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Final outcome of a verification run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationResult {
    pub attested: bool,
    pub root: Root,
    /// Provenance only, not bound to the root
    pub epoch: EpochId,
}

/// Attest `root` for `epoch`. The attestation holds iff the root matched.
pub fn attest(matches: bool, root: Root, epoch: EpochId) -> AttestationResult {
    AttestationResult {
        attested: matches,
        root,
        epoch,
    }
}
