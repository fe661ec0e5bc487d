//! Verification run configuration

use crate::{attest::EpochId, error::Error, hash::HashAlgorithm};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Location of the codex holding the laws
    pub document_source_ref: PathBuf,

    /// Previously published root, hex with or without `0x`
    pub expected_root: String,

    /// Epoch the attestation is issued for
    pub epoch_id: EpochId,

    /// Transactions expected to carry the root
    #[serde(default)]
    pub ledger_tx_ids: Vec<String>,

    /// Hash function used for leaves and nodes
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,

    /// Known transaction payloads (hex calldata) keyed by transaction id.
    /// Without any, ledger corroboration is reported as not configured.
    #[serde(default)]
    pub ledger_payloads: BTreeMap<String, String>,
}

impl VerifierConfig {
    pub fn new(
        document_source_ref: impl Into<PathBuf>,
        expected_root: impl Into<String>,
        epoch_id: EpochId,
    ) -> Self {
        Self {
            document_source_ref: document_source_ref.into(),
            expected_root: expected_root.into(),
            epoch_id,
            ledger_tx_ids: Vec::new(),
            hash_algorithm: HashAlgorithm::default(),
            ledger_payloads: BTreeMap::new(),
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// A relative `document_source_ref` is resolved against the directory
    /// holding the configuration file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml(&contents)?;
        if config.document_source_ref.is_relative() {
            if let Some(dir) = path.parent() {
                config.document_source_ref = dir.join(&config.document_source_ref);
            }
        }
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, Error> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}
