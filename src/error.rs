//! Error types surfaced by proof retrieval and decoding.

use alloy_primitives::B256;
use thiserror::Error;

/// A node response that cannot be turned into a canonical header or proof.
///
/// Never recovered from locally: substituting a default would yield a header or proof that
/// looks fine here and only fails much later, during cryptographic verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedPayload {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("missing field `{field}`, required once {fork} is active")]
    MissingForkField { field: &'static str, fork: &'static str },
    #[error("unexpected field `{field}` in block {number}: {fork} is not active for this chain")]
    UnexpectedForkField { field: &'static str, fork: &'static str, number: u64 },
    #[error("field `{field}` is present but earlier optional field `{missing}` is not")]
    OptionalFieldGap { field: &'static str, missing: &'static str },
    #[error("field `{field}` is not valid hex: {reason}")]
    InvalidHex { field: &'static str, reason: String },
    #[error("field `{field}` must be {expected} bytes, got {actual}")]
    InvalidLength { field: &'static str, expected: usize, actual: usize },
    #[error("{proof}[{index}] is not valid hex: {reason}")]
    InvalidProofNodeHex { proof: &'static str, index: usize, reason: String },
    #[error("{proof}[{index}] is not a trie node: {reason}")]
    InvalidProofNode { proof: &'static str, index: usize, reason: String },
    #[error("node returned no block for {0}")]
    BlockNotFound(String),
    #[error("node returned no storage proof for slot {0}")]
    StorageProofMissing(B256),
}

/// Failure talking to the JSON-RPC endpoint.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid RPC endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error(transparent)]
    Client(#[from] jsonrpsee::core::ClientError),
}

/// A computed header hash that disagrees with the hash reported by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("header hash mismatch: computed {computed}, node reported {reported}")]
pub struct HashMismatch {
    pub computed: B256,
    pub reported: B256,
}

/// Errors returned by [`crate::ProofRetriever`].
#[derive(Debug, Error)]
pub enum ProofError {
    /// Transport or JSON-RPC failure, passed through unmodified.
    #[error("upstream RPC unavailable: {0}")]
    UpstreamUnavailable(#[from] RpcError),
    /// The node answered, but with something that does not decode.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] MalformedPayload),
}

impl ProofError {
    /// Returns `true` for transport-level failures.
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_))
    }

    /// Returns `true` for decode failures.
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPayload(_))
    }
}
