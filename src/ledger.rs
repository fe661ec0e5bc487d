//! Corroboration of a root against ledger transaction payloads.
//!
//! Corroboration is auxiliary: its outcome is reported next to the
//! attestation but never changes whether the root matched.

use crate::hash::{strip_hex_prefix, Root};
use std::{collections::BTreeMap, fmt};

/// Marker preceding a hex root embedded in a payload
pub const ROOT_MARKER: &[u8] = b"ROOT=";

/// Outcome of checking one transaction for a root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Corroboration {
    /// No ledger checker is configured, nothing was checked
    NotConfigured,
    /// The payload was inspected and contains the root
    Present,
    /// The payload was inspected and does not contain the root
    Absent,
    /// The payload could not be inspected
    Unavailable(String),
}

impl Corroboration {
    pub fn is_present(&self) -> bool {
        matches!(self, Corroboration::Present)
    }
}

impl fmt::Display for Corroboration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corroboration::NotConfigured => f.write_str("not configured"),
            Corroboration::Present => f.write_str("root present"),
            Corroboration::Absent => f.write_str("root absent"),
            Corroboration::Unavailable(reason) => write!(f, "unavailable: {reason}"),
        }
    }
}

/// Capability to look for a root inside a transaction's payload
pub trait LedgerChecker {
    fn payload_contains_root(&self, tx_id: &str, root: &Root) -> Corroboration;
}

/// Checker used when no ledger is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl LedgerChecker for Unconfigured {
    fn payload_contains_root(&self, _tx_id: &str, _root: &Root) -> Corroboration {
        Corroboration::NotConfigured
    }
}

/// Checker over transaction payloads (hex calldata) supplied up front
#[derive(Debug, Clone, Default)]
pub struct PayloadLedger {
    payloads: BTreeMap<String, String>,
}

impl PayloadLedger {
    pub fn new(payloads: BTreeMap<String, String>) -> Self {
        Self {
            payloads: payloads
                .into_iter()
                .map(|(tx_id, payload)| (normalize_tx_id(&tx_id), payload))
                .collect(),
        }
    }

    pub fn insert(&mut self, tx_id: &str, payload: impl Into<String>) {
        self.payloads.insert(normalize_tx_id(tx_id), payload.into());
    }
}

impl LedgerChecker for PayloadLedger {
    fn payload_contains_root(&self, tx_id: &str, root: &Root) -> Corroboration {
        let Some(payload) = self.payloads.get(&normalize_tx_id(tx_id)) else {
            return Corroboration::Unavailable(format!("no payload known for {tx_id}"));
        };
        match hex::decode(strip_hex_prefix(payload.trim())) {
            Ok(data) if payload_contains(&data, root) => Corroboration::Present,
            Ok(_) => Corroboration::Absent,
            Err(e) => Corroboration::Unavailable(format!("payload of {tx_id} is not hex: {e}")),
        }
    }
}

fn normalize_tx_id(tx_id: &str) -> String {
    strip_hex_prefix(tx_id.trim()).to_ascii_lowercase()
}

/// True if `data` holds the raw root bytes or a `ROOT=` marker followed by
/// the root in hex
fn payload_contains(data: &[u8], root: &Root) -> bool {
    if data.windows(root.len()).any(|window| window == &root[..]) {
        return true;
    }
    let root_hex = root.to_hex();
    data.windows(ROOT_MARKER.len())
        .enumerate()
        .filter(|(_, window)| *window == ROOT_MARKER)
        .any(|(start, _)| {
            let rest = &data[start + ROOT_MARKER.len()..];
            let rest = rest
                .strip_prefix(b"0x")
                .or_else(|| rest.strip_prefix(b"0X"))
                .unwrap_or(rest);
            rest.len() >= root_hex.len()
                && rest[..root_hex.len()].eq_ignore_ascii_case(root_hex.as_bytes())
        })
}
