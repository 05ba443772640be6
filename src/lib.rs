//! eth-proof: block-pinned account proofs from Ethereum-family JSON-RPC nodes.
//!
//! A [`ProofRetriever`] resolves a block (by hash, or the latest one), decodes its header
//! into the canonical form of the configured chain, and fetches the account proof pinned to
//! that block's number. The decoded header hashes to the block hash the node reported, so
//! the pair can be checked without trusting the node.
//!
//! ## Header variants
//!
//! Chains append post-fork fields to the header at different points. The variant is picked
//! from the chain id once, at construction:
//!
//! | Chain id | Variant | Notes |
//! |----------|---------|-------|
//! | 1 | Mainnet | London, Shanghai, Cancun, Prague |
//! | 5 | Goerli | never reached Prague |
//! | 11155111 | Sepolia | London at genesis |
//! | 56 | BSC mainnet | blob fields at Tycho, beacon root at Bohr |
//! | 97 | BSC testnet | same shape as BSC mainnet |
//! | other | Generic | mainnet field order, post-fork fields as the payload carries them |
//!
//! ## Usage
//!
//! ```bash
//! ETH_PROOF_RPC_URL=http://localhost:8545 eth-proof \
//!   --address 0x00000000219ab540356cbb839cbe05303d7705fa
//! ```

// Core modules
pub mod chainspec;
pub mod config;
pub mod error;
pub mod header;
pub mod metrics;
pub mod proof;
pub mod retriever;
pub mod rpc;
pub mod version;

mod primitives;

// Re-export key types
pub use chainspec::ChainVariant;
pub use config::RetrieverConfig;
pub use error::{HashMismatch, MalformedPayload, ProofError, RpcError};
pub use header::{BlockHeader, HeaderCodec};
pub use proof::{AccountProof, ProofNode, ProofNodeKind, StorageProof};
pub use retriever::{empty_proof, ProofResult, ProofRetriever, StorageProofResult};
pub use rpc::{EthProofRpc, HttpEthProofRpc};
