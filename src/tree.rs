//! Merkle tree construction and root verification over codex documents.

use crate::{
    document::Document,
    error::Error,
    hash::{DigestProvider, Leaf, MerkleHash, Root},
};
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Hash every document into a leaf, in sorted document order.
///
/// Documents are sorted by their raw text before hashing so the leaves only
/// depend on the content of the set, never on the order it was loaded in.
/// Duplicates are kept.
pub fn derive_leaves<HF: DigestProvider>(documents: &[Document]) -> Result<Vec<Leaf>, Error> {
    if documents.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut sorted: Vec<&Document> = documents.iter().collect();
    sorted.sort();
    Ok(sorted
        .into_iter()
        .map(|document| HF::hash(document.as_bytes()))
        .collect())
}

/// Reduce a level of the tree to its parent level.
///
/// Nodes are paired left to right. A trailing node without a sibling is
/// paired with itself.
pub(crate) fn next_level<HF: DigestProvider>(level: &[MerkleHash]) -> Vec<MerkleHash> {
    level
        .chunks(2)
        .map(|pair| HF::hash_pair(&pair[0], &pair[pair.len() - 1]))
        .collect()
}

/// Reduce a sequence of leaves to the Merkle root
pub fn reduce_to_root<HF: DigestProvider>(leaves: &[Leaf]) -> Result<Root, Error> {
    if leaves.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut current = leaves.to_vec();
    while current.len() > 1 {
        current = next_level::<HF>(&current);
    }
    Ok(current[0])
}

/// Outcome of comparing a computed root against an expected one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    pub computed_root: Root,
    pub matches: bool,
}

/// Compute the root of `documents` and compare it with `expected_root`.
///
/// The comparison ignores hex case and the `0x` prefix. An expected root
/// that is not a 32 byte hex digest never matches.
pub fn verify<HF: DigestProvider>(
    documents: &[Document],
    expected_root: &str,
) -> Result<Verification, Error> {
    let leaves = derive_leaves::<HF>(documents)?;
    let computed_root = reduce_to_root::<HF>(&leaves)?;
    let matches = match MerkleHash::from_hex(expected_root) {
        Ok(expected) => expected == computed_root,
        Err(e) => {
            warn!(error = %e, "expected root is not a well formed digest");
            false
        }
    };
    debug!(
        leaves = leaves.len(),
        computed_root = %computed_root,
        expected_root,
        matches,
        "verified document set"
    );
    Ok(Verification {
        computed_root,
        matches,
    })
}

/// Merkle Tree data structure holding every level from leaves to root
#[derive(Debug, Clone)]
pub struct MerkleTree<HF: DigestProvider> {
    _hasher: PhantomData<HF>,
    /// `levels[0]` are the leaves, the last level holds only the root
    pub(crate) levels: Vec<Vec<MerkleHash>>,
}

impl<HF: DigestProvider> MerkleTree<HF> {
    /// Build a tree over a set of documents
    pub fn from_documents(documents: &[Document]) -> Result<Self, Error> {
        Self::from_leaves(derive_leaves::<HF>(documents)?)
    }

    /// Build a tree over already hashed leaves, kept in the given order
    pub fn from_leaves(leaves: Vec<Leaf>) -> Result<Self, Error> {
        if leaves.is_empty() {
            return Err(Error::EmptyInput);
        }
        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let parent = next_level::<HF>(&levels[levels.len() - 1]);
            levels.push(parent);
        }
        Ok(Self {
            _hasher: PhantomData,
            levels,
        })
    }

    /// Get the merkle root of the tree
    pub fn root(&self) -> &Root {
        &self.levels[self.levels.len() - 1][0]
    }

    /// Leaves in sorted document order
    pub fn leaves(&self) -> &[Leaf] {
        &self.levels[0]
    }

    /// Get the number of leaves in the tree
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of reduction rounds between the leaves and the root
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Nodes at a given level, counted from the leaves
    pub fn level(&self, index: usize) -> Option<&[MerkleHash]> {
        self.levels.get(index).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_nodes;
    use blake2::Blake2s256;
    use sha3::{Keccak256, Sha3_256};

    fn docs(texts: &[&str]) -> Vec<Document> {
        texts.iter().copied().map(Document::from).collect()
    }

    fn leaf(text: &str) -> Leaf {
        Keccak256::hash(text.as_bytes())
    }

    #[test]
    fn test_root_is_order_independent() {
        let forward = docs(&["LAW 1: x", "LAW 2: y", "LAW 3: z", "LAW 4: w"]);
        let mut backward = forward.clone();
        backward.reverse();
        let shuffled = docs(&["LAW 3: z", "LAW 1: x", "LAW 4: w", "LAW 2: y"]);

        let root = reduce_to_root::<Keccak256>(&derive_leaves::<Keccak256>(&forward).unwrap())
            .unwrap();
        for set in [&forward, &backward, &shuffled] {
            let leaves = derive_leaves::<Keccak256>(set).unwrap();
            assert_eq!(reduce_to_root::<Keccak256>(&leaves).unwrap(), root);
        }
    }

    #[test]
    fn test_single_character_change_changes_root() {
        let original = docs(&["LAW 1: x", "LAW 2: y", "LAW 3: z"]);
        let altered = docs(&["LAW 1: x", "LAW 2: Y", "LAW 3: z"]);
        let original_tree = MerkleTree::<Keccak256>::from_documents(&original).unwrap();
        let altered_tree = MerkleTree::<Keccak256>::from_documents(&altered).unwrap();
        assert_ne!(original_tree.root(), altered_tree.root());
    }

    #[test]
    fn test_adding_or_removing_document_changes_root() {
        let base = docs(&["LAW 1: x", "LAW 2: y"]);
        let added = docs(&["LAW 1: x", "LAW 2: y", "LAW 3: z"]);
        let removed = docs(&["LAW 1: x"]);
        let duplicated = docs(&["LAW 1: x", "LAW 2: y", "LAW 2: y"]);
        fn root(set: &[Document]) -> Root {
            *MerkleTree::<Keccak256>::from_documents(set).unwrap().root()
        }
        assert_ne!(root(&base), root(&added));
        assert_ne!(root(&base), root(&removed));
        assert_ne!(root(&base), root(&duplicated));
    }

    #[test]
    fn test_single_leaf_is_root() {
        let x = leaf("only");
        assert_eq!(reduce_to_root::<Keccak256>(&[x]).unwrap(), x);
        let tree = MerkleTree::<Keccak256>::from_leaves(vec![x]).unwrap();
        assert_eq!(tree.root(), &x);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_odd_level_self_pairing() {
        let (a, b, c) = (leaf("a"), leaf("b"), leaf("c"));
        let expected = hash_nodes::<Keccak256>(
            &hash_nodes::<Keccak256>(&a, &b),
            &hash_nodes::<Keccak256>(&c, &c),
        );
        assert_eq!(reduce_to_root::<Keccak256>(&[a, b, c]).unwrap(), expected);
        // Promoting `c` unchanged would give a different root
        assert_ne!(
            expected,
            hash_nodes::<Keccak256>(&hash_nodes::<Keccak256>(&a, &b), &c)
        );
    }

    #[test]
    fn test_five_leaves_self_pair_at_every_odd_level() {
        let leaves: Vec<Leaf> = ["a", "b", "c", "d", "e"].iter().map(|t| leaf(t)).collect();
        let ab = hash_nodes::<Keccak256>(&leaves[0], &leaves[1]);
        let cd = hash_nodes::<Keccak256>(&leaves[2], &leaves[3]);
        let ee = hash_nodes::<Keccak256>(&leaves[4], &leaves[4]);
        let abcd = hash_nodes::<Keccak256>(&ab, &cd);
        let eeee = hash_nodes::<Keccak256>(&ee, &ee);
        let expected = hash_nodes::<Keccak256>(&abcd, &eeee);

        assert_eq!(reduce_to_root::<Keccak256>(&leaves).unwrap(), expected);
        let tree = MerkleTree::<Keccak256>::from_leaves(leaves).unwrap();
        assert_eq!(tree.root(), &expected);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.level(1).unwrap(), &[ab, cd, ee]);
        assert_eq!(tree.level(2).unwrap(), &[abcd, eeee]);
        assert!(tree.level(4).is_none());
    }

    #[test]
    fn test_depth_is_ceil_log2() {
        let cases = [
            (1usize, 0usize),
            (2, 1),
            (3, 2),
            (4, 2),
            (5, 3),
            (8, 3),
            (9, 4),
            (100, 7),
        ];
        for (count, depth) in cases {
            let leaves: Vec<Leaf> = (0..count).map(|i| leaf(&i.to_string())).collect();
            let tree = MerkleTree::<Sha3_256>::from_leaves(leaves.clone()).unwrap();
            assert_eq!(tree.depth(), depth, "depth for {count} leaves");
            assert_eq!(tree.leaf_count(), count);
            assert_eq!(tree.root(), &reduce_to_root::<Sha3_256>(&leaves).unwrap());
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(derive_leaves::<Keccak256>(&[]), Err(Error::EmptyInput));
        assert_eq!(reduce_to_root::<Keccak256>(&[]), Err(Error::EmptyInput));
        assert_eq!(verify::<Keccak256>(&[], "0x00"), Err(Error::EmptyInput));
        assert!(matches!(
            MerkleTree::<Keccak256>::from_leaves(vec![]),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_leaves_sorted_before_hashing() {
        assert_eq!(
            derive_leaves::<Keccak256>(&docs(&["B", "A"])).unwrap(),
            derive_leaves::<Keccak256>(&docs(&["A", "B"])).unwrap()
        );
        assert_eq!(
            derive_leaves::<Keccak256>(&docs(&["B", "A"])).unwrap(),
            vec![leaf("A"), leaf("B")]
        );
    }

    #[test]
    fn test_end_to_end_two_laws() {
        let laws = docs(&["LAW 2: y", "LAW 1: x"]);
        let l1 = leaf("LAW 1: x");
        let l2 = leaf("LAW 2: y");
        let expected = Keccak256::hash(&[&l1[..], &l2[..]].concat());

        let tree = MerkleTree::<Keccak256>::from_documents(&laws).unwrap();
        assert_eq!(tree.leaves(), &[l1, l2]);
        assert_eq!(tree.root(), &expected);

        let outcome = verify::<Keccak256>(&laws, &expected.to_string()).unwrap();
        assert!(outcome.matches);
        assert_eq!(outcome.computed_root, expected);

        let shouting = format!("0X{}", expected.to_hex().to_uppercase());
        assert!(verify::<Keccak256>(&laws, &shouting).unwrap().matches);
        assert!(verify::<Keccak256>(&laws, &expected.to_hex()).unwrap().matches);

        let other = verify::<Keccak256>(&laws, &l1.to_string()).unwrap();
        assert!(!other.matches);
        assert_eq!(other.computed_root, expected);
        assert!(!verify::<Keccak256>(&laws, &MerkleHash::default().to_string())
            .unwrap()
            .matches);
    }

    #[test]
    fn test_malformed_expected_root_does_not_match() {
        let laws = docs(&["LAW 1: x"]);
        assert!(!verify::<Keccak256>(&laws, "0x545d0e48624049cb1f3500ab55a60bc4")
            .unwrap()
            .matches);
        assert!(!verify::<Keccak256>(&laws, "not hex").unwrap().matches);
    }

    #[test]
    fn test_expected_root_normalization() {
        let laws = docs(&["LAW 1: x", "LAW 1: x", "LAW 2: y"]);
        let tree = MerkleTree::<Keccak256>::from_documents(&laws).unwrap();
        assert_eq!(tree.leaf_count(), 3);
        let root = *tree.root();

        let padded = format!("  {root}\n");
        assert!(verify::<Keccak256>(&laws, &padded).unwrap().matches);
        let doubled = format!("0x{root}");
        assert!(!verify::<Keccak256>(&laws, &doubled).unwrap().matches);
        assert!(!verify::<Keccak256>(&laws, "").unwrap().matches);
    }

    #[test]
    fn test_hash_function_is_a_parameter() {
        let laws = docs(&["LAW 1: x", "LAW 2: y", "LAW 3: z"]);
        let keccak = MerkleTree::<Keccak256>::from_documents(&laws).unwrap();
        let sha3 = MerkleTree::<Sha3_256>::from_documents(&laws).unwrap();
        let blake = MerkleTree::<Blake2s256>::from_documents(&laws).unwrap();
        assert_ne!(keccak.root(), sha3.root());
        assert_ne!(keccak.root(), blake.root());
        assert_ne!(sha3.root(), blake.root());
    }
}
