//! Digest primitives used for leaves and interior nodes

use crate::error::Error;
use serde::{Deserialize, Serialize};
use sha3::digest::{consts::U32, Digest, OutputSizeUser};
use std::{fmt, ops::Deref, str::FromStr};

/// Length in bytes of every digest in the tree
pub const DIGEST_LEN: usize = 32;

/// A hash function able to produce 32 byte Merkle digests.
///
/// Implemented for every RustCrypto hasher with a 256 bit output, so
/// `sha3::Keccak256`, `sha3::Sha3_256` and `blake2::Blake2s256` can all be
/// used as the tree's hash function.
pub trait DigestProvider {
    /// Hash an arbitrary byte string
    fn hash(data: &[u8]) -> MerkleHash;

    /// Hash two nodes on a merkle tree by concatenating the raw bytes of the
    /// left and right children
    fn hash_pair(left: &[u8], right: &[u8]) -> MerkleHash;
}

impl<D> DigestProvider for D
where
    D: Digest + OutputSizeUser<OutputSize = U32>,
{
    fn hash(data: &[u8]) -> MerkleHash {
        let mut hasher = D::new();
        hasher.update(data);
        finalize::<D>(hasher)
    }

    fn hash_pair(left: &[u8], right: &[u8]) -> MerkleHash {
        let mut hasher = D::new();
        hasher.update(left);
        hasher.update(right);
        finalize::<D>(hasher)
    }
}

fn finalize<D: Digest + OutputSizeUser<OutputSize = U32>>(hasher: D) -> MerkleHash {
    let mut result = [0u8; DIGEST_LEN];
    result.copy_from_slice(hasher.finalize().as_slice());
    MerkleHash(result)
}

/// Hash two nodes with the given hash function
pub fn hash_nodes<HF: DigestProvider>(left: &[u8], right: &[u8]) -> MerkleHash {
    HF::hash_pair(left, right)
}

/// A leaf, interior node or root of the tree.
///
/// Displayed as lowercase hex with a `0x` prefix.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MerkleHash(pub [u8; DIGEST_LEN]);

/// Digest of a single document
pub type Leaf = MerkleHash;
/// Digest identifying a whole document set
pub type Root = MerkleHash;

impl MerkleHash {
    /// Parse a digest from hex, with or without a `0x` prefix, in either case
    pub fn from_hex(text: &str) -> Result<Self, Error> {
        let bytes = hex::decode(strip_hex_prefix(text.trim()))
            .map_err(|e| Error::InvalidDigest(format!("{text:?}: {e}")))?;
        if bytes.len() != DIGEST_LEN {
            return Err(Error::InvalidDigest(format!(
                "{text:?}: expected {DIGEST_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut result = [0u8; DIGEST_LEN];
        result.copy_from_slice(&bytes);
        Ok(MerkleHash(result))
    }

    /// Lowercase hex without the `0x` prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Strip a leading `0x` or `0X`
pub(crate) fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

impl fmt::Display for MerkleHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for MerkleHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Deref for MerkleHash {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq<[u8; DIGEST_LEN]> for MerkleHash {
    fn eq(&self, other: &[u8; DIGEST_LEN]) -> bool {
        &self.0 == other
    }
}

/// Hash functions selectable at runtime
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[default]
    #[serde(rename = "keccak256")]
    Keccak256,
    #[serde(rename = "sha3-256")]
    Sha3_256,
    #[serde(rename = "blake2s256")]
    Blake2s256,
}

impl HashAlgorithm {
    /// Name used in configuration files and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Keccak256 => "keccak256",
            HashAlgorithm::Sha3_256 => "sha3-256",
            HashAlgorithm::Blake2s256 => "blake2s256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keccak256" | "keccak-256" => Ok(HashAlgorithm::Keccak256),
            "sha3-256" | "sha3_256" | "sha3" => Ok(HashAlgorithm::Sha3_256),
            "blake2s256" | "blake2s" => Ok(HashAlgorithm::Blake2s256),
            other => Err(Error::Config(format!("unknown hash algorithm {other:?}"))),
        }
    }
}
