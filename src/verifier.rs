//! One verification run: load, commit, compare, attest, corroborate, report.

use crate::{
    attest::attest,
    config::VerifierConfig,
    document::Document,
    error::Error,
    hash::{HashAlgorithm, Leaf, MerkleHash, Root},
    ledger::{Corroboration, LedgerChecker, PayloadLedger, Unconfigured},
    report::{Reporter, VerificationReport},
    source::{CodexFile, DocumentSource},
    tree::{verify, MerkleTree, Verification},
};
use blake2::Blake2s256;
use sha3::{Keccak256, Sha3_256};
use tracing::{debug, info_span};

/// Leaves and root of a document set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commitment {
    pub leaves: Vec<Leaf>,
    pub root: Root,
    pub depth: usize,
}

impl<HF: crate::hash::DigestProvider> From<MerkleTree<HF>> for Commitment {
    fn from(tree: MerkleTree<HF>) -> Self {
        Self {
            root: *tree.root(),
            depth: tree.depth(),
            leaves: tree.leaves().to_vec(),
        }
    }
}

/// Build the Merkle tree of `documents` with a runtime selected hash function
pub fn commit(algorithm: HashAlgorithm, documents: &[Document]) -> Result<Commitment, Error> {
    Ok(match algorithm {
        HashAlgorithm::Keccak256 => MerkleTree::<Keccak256>::from_documents(documents)?.into(),
        HashAlgorithm::Sha3_256 => MerkleTree::<Sha3_256>::from_documents(documents)?.into(),
        HashAlgorithm::Blake2s256 => MerkleTree::<Blake2s256>::from_documents(documents)?.into(),
    })
}

/// [`verify`] with a runtime selected hash function
pub fn verify_with(
    algorithm: HashAlgorithm,
    documents: &[Document],
    expected_root: &str,
) -> Result<Verification, Error> {
    match algorithm {
        HashAlgorithm::Keccak256 => verify::<Keccak256>(documents, expected_root),
        HashAlgorithm::Sha3_256 => verify::<Sha3_256>(documents, expected_root),
        HashAlgorithm::Blake2s256 => verify::<Blake2s256>(documents, expected_root),
    }
}

/// Ledger checker described by a configuration
pub fn ledger_for(config: &VerifierConfig) -> Box<dyn LedgerChecker> {
    if config.ledger_payloads.is_empty() {
        Box::new(Unconfigured)
    } else {
        Box::new(PayloadLedger::new(config.ledger_payloads.clone()))
    }
}

/// Run a verification with the codex and ledger described by `config`
pub fn run_config(
    config: &VerifierConfig,
    reporter: &dyn Reporter,
) -> Result<VerificationReport, Error> {
    let source = CodexFile::new(&config.document_source_ref);
    let ledger = ledger_for(config);
    run(config, &source, ledger.as_ref(), reporter)
}

/// Run a full verification.
///
/// Any error aborts the run before anything is reported. Ledger
/// corroboration looks for the expected root and never affects the
/// attestation.
pub fn run(
    config: &VerifierConfig,
    source: &dyn DocumentSource,
    ledger: &dyn LedgerChecker,
    reporter: &dyn Reporter,
) -> Result<VerificationReport, Error> {
    let source_ref = config.document_source_ref.display().to_string();
    let _span = info_span!("verify", source = %source_ref, epoch = %config.epoch_id).entered();

    let documents = source.load_documents()?;
    let verification = verify_with(config.hash_algorithm, &documents, &config.expected_root)?;
    let attestation = attest(
        verification.matches,
        verification.computed_root,
        config.epoch_id.clone(),
    );

    let published = MerkleHash::from_hex(&config.expected_root);
    let corroborations = config
        .ledger_tx_ids
        .iter()
        .map(|tx_id| {
            let outcome = match &published {
                Ok(root) => ledger.payload_contains_root(tx_id, root),
                Err(e) => Corroboration::Unavailable(e.to_string()),
            };
            debug!(tx = %tx_id, outcome = %outcome, "checked transaction");
            (tx_id.clone(), outcome)
        })
        .collect();

    let report = VerificationReport {
        source_ref,
        algorithm: config.hash_algorithm,
        leaf_count: documents.len(),
        computed_root: verification.computed_root,
        expected_root: config.expected_root.clone(),
        matches: verification.matches,
        attestation,
        corroborations,
    };
    reporter.report(&report);
    Ok(report)
}
