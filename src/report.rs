//! Reporting of verification runs

use crate::{
    attest::AttestationResult,
    hash::{HashAlgorithm, Root},
    ledger::Corroboration,
};
use tracing::{info, warn};

/// Everything a verification run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub source_ref: String,
    pub algorithm: HashAlgorithm,
    pub leaf_count: usize,
    pub computed_root: Root,
    pub expected_root: String,
    pub matches: bool,
    pub attestation: AttestationResult,
    /// Ledger corroboration per transaction id, in configured order
    pub corroborations: Vec<(String, Corroboration)>,
}

/// Receives the outcome of every completed verification run
pub trait Reporter {
    fn report(&self, report: &VerificationReport);
}

/// Emits reports as `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, report: &VerificationReport) {
        info!(
            source = %report.source_ref,
            algorithm = %report.algorithm,
            leaves = report.leaf_count,
            computed_root = %report.computed_root,
            "computed merkle root"
        );
        if !report.matches {
            warn!(
                computed_root = %report.computed_root,
                expected_root = %report.expected_root,
                "root mismatch, codex altered?"
            );
        }
        for (tx_id, corroboration) in &report.corroborations {
            info!(tx = %tx_id, outcome = %corroboration, "ledger corroboration");
        }
        info!(
            attested = report.attestation.attested,
            root = %report.attestation.root,
            epoch = %report.attestation.epoch,
            "attestation"
        );
    }
}

/// Discards reports
impl Reporter for () {
    fn report(&self, _report: &VerificationReport) {}
}
