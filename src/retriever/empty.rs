//! Placeholder proof results.

use super::ProofResult;
use crate::{header::BlockHeader, proof::AccountProof};

/// Number of placeholder nodes in a sentinel proof.
pub const SENTINEL_PROOF_LEN: usize = 5;

/// Builds the fixed placeholder result: an all-zero header and [`SENTINEL_PROOF_LEN`]
/// zero-filled nodes.
///
/// It exists so callers can fill a slot where a proof is structurally required but none is
/// available. The nodes are not trie nodes and the first one does not hash to the header's
/// state root, so it never verifies. Use [`ProofResult::is_sentinel`] to detect it.
pub fn empty_proof() -> ProofResult {
    ProofResult::new(BlockHeader::zeroed(), AccountProof::placeholders(SENTINEL_PROOF_LEN))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{keccak256, B256};

    use super::*;
    use crate::proof::ProofNodeKind;

    #[test]
    fn sentinel_has_fixed_shape() {
        let sentinel = empty_proof();
        assert!(sentinel.is_sentinel());
        assert_eq!(sentinel.account_proof().len(), SENTINEL_PROOF_LEN);
        assert!(sentinel
            .account_proof()
            .iter()
            .all(|node| node.kind() == ProofNodeKind::Placeholder && node.raw().len() == 32));
        assert_eq!(sentinel, empty_proof());
    }

    #[test]
    fn sentinel_never_verifies() {
        let sentinel = empty_proof();
        let root = sentinel.header().state_root;
        assert_eq!(root, B256::ZERO);
        assert_ne!(keccak256(sentinel.account_proof()[0].raw()), root);
    }

    #[test]
    fn genuine_empty_proof_is_not_a_sentinel() {
        let (header, _) = empty_proof().into_parts();
        let absent = ProofResult::new(header, AccountProof::default());
        assert!(!absent.is_sentinel());
    }
}
