//! Merkle commitments over a codex of laws, and verification of a published
//! root against the current codex.

mod attest;
mod config;
mod document;
mod error;
mod hash;
mod ledger;
mod report;
mod source;
mod tree;
mod verifier;

pub use crate::{
    attest::{attest, AttestationResult, EpochId},
    config::VerifierConfig,
    document::Document,
    error::Error,
    hash::{hash_nodes, DigestProvider, HashAlgorithm, Leaf, MerkleHash, Root, DIGEST_LEN},
    ledger::{Corroboration, LedgerChecker, PayloadLedger, Unconfigured, ROOT_MARKER},
    report::{Reporter, TracingReporter, VerificationReport},
    source::{split_laws, CodexFile, DocumentSource, StaticDocuments, LAW_MARKER},
    tree::{derive_leaves, reduce_to_root, verify, MerkleTree, Verification},
    verifier::{commit, ledger_for, run, run_config, verify_with, Commitment},
};

/// Hash functions usable as the tree's [`DigestProvider`]
pub use blake2::Blake2s256;
pub use sha3::{Keccak256, Sha3_256};
