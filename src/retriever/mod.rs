//! Block-pinned proof retrieval.
//!
//! A proof is only useful next to the header it was taken against, so every fetch resolves
//! one block first and then asks for the proof at that block's number. Asking for
//! "latest" twice would race the chain head.

mod empty;

use std::time::Instant;

use alloy_eips::BlockNumberOrTag;
use alloy_primitives::{Address, B256};
use serde::Serialize;
use tracing::{debug, warn};

pub use empty::{empty_proof, SENTINEL_PROOF_LEN};

use crate::{
    chainspec::ChainVariant,
    config::RetrieverConfig,
    error::{MalformedPayload, ProofError, RpcError},
    header::{BlockHeader, HeaderCodec},
    metrics::ProofFetchMetrics,
    proof::{AccountProof, ProofNodeKind, StorageProof},
    rpc::{EthProofRpc, HttpEthProofRpc, RpcBlockPayload, RpcProofPayload},
};

const ACCOUNT_PROOF: &str = "accountProof";

/// A header and the account proof taken against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofResult {
    header: BlockHeader,
    account_proof: AccountProof,
}

impl ProofResult {
    pub const fn new(header: BlockHeader, account_proof: AccountProof) -> Self {
        Self { header, account_proof }
    }

    pub const fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub const fn account_proof(&self) -> &AccountProof {
        &self.account_proof
    }

    pub fn into_parts(self) -> (BlockHeader, AccountProof) {
        (self.header, self.account_proof)
    }

    /// Returns `true` for the placeholder produced by [`empty_proof`].
    ///
    /// A genuine proof of absence has no nodes at all; the sentinel carries placeholder
    /// entries that are not trie nodes.
    pub fn is_sentinel(&self) -> bool {
        !self.account_proof.is_empty() &&
            self.account_proof.iter().all(|node| node.kind() == ProofNodeKind::Placeholder)
    }
}

/// A header with the account proof and one storage slot proof taken against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageProofResult {
    pub header: BlockHeader,
    pub account_proof: AccountProof,
    pub storage_proof: StorageProof,
}

/// Fetches headers and proofs from one chain.
#[derive(Debug)]
pub struct ProofRetriever<C = HttpEthProofRpc> {
    client: C,
    variant: ChainVariant,
    metrics: ProofFetchMetrics,
}

impl ProofRetriever<HttpEthProofRpc> {
    /// Connects to the configured endpoint over HTTP.
    pub fn from_config(config: &RetrieverConfig) -> Result<Self, RpcError> {
        Ok(Self::new(HttpEthProofRpc::new(&config.rpc_url)?, config.chain_id))
    }
}

impl<C: EthProofRpc> ProofRetriever<C> {
    /// Creates a retriever whose header variant is chosen from `chain_id`.
    ///
    /// Unknown chain ids use the generic variant; see [`ChainVariant::resolve`].
    pub fn new(client: C, chain_id: u64) -> Self {
        Self { client, variant: ChainVariant::resolve(chain_id), metrics: ProofFetchMetrics::new() }
    }

    /// The header variant selected at construction.
    pub const fn variant(&self) -> ChainVariant {
        self.variant
    }

    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Fetches the proof of `address` at `block_hash`, or at the latest block.
    pub async fn fetch_account_proof(
        &self,
        address: Address,
        block_hash: Option<B256>,
    ) -> Result<ProofResult, ProofError> {
        let header = self.resolve_header(block_hash).await?;
        let proof = self.proof_at(address, Vec::new(), header.number).await?;
        let account_proof = self.decode_account_proof(&proof)?;

        debug!(
            target: "eth_proof::retriever",
            %address,
            number = header.number,
            nodes = account_proof.len(),
            "Fetched account proof"
        );
        Ok(ProofResult::new(header, account_proof))
    }

    /// Fetches the account proof of `address` together with the proof of storage `slot`,
    /// both pinned to the same block.
    pub async fn fetch_storage_proof(
        &self,
        address: Address,
        slot: B256,
        block_hash: Option<B256>,
    ) -> Result<StorageProofResult, ProofError> {
        let header = self.resolve_header(block_hash).await?;
        let proof = self.proof_at(address, vec![slot], header.number).await?;
        let account_proof = self.decode_account_proof(&proof)?;
        let raw_storage = self.track(
            proof.storage_proof.first().ok_or(MalformedPayload::StorageProofMissing(slot)),
        )?;
        let storage_proof = self.track(StorageProof::decode(raw_storage))?;

        debug!(
            target: "eth_proof::retriever",
            %address,
            %slot,
            number = header.number,
            account_nodes = account_proof.len(),
            storage_nodes = storage_proof.nodes.len(),
            "Fetched storage proof"
        );
        Ok(StorageProofResult { header, account_proof, storage_proof })
    }

    /// Fetches and decodes the header of block `number`.
    pub async fn header_by_number(&self, number: u64) -> Result<BlockHeader, ProofError> {
        let block = BlockNumberOrTag::Number(number);
        let raw = self.fetch_block(block.to_string(), self.client.block_by_number(block, false)).await?;
        self.decode_header(&raw)
    }

    /// Fetches and decodes the header of the block with `hash`.
    pub async fn header_by_hash(&self, hash: B256) -> Result<BlockHeader, ProofError> {
        let raw = self.fetch_block(hash.to_string(), self.client.block_by_hash(hash, false)).await?;
        self.decode_header(&raw)
    }

    async fn resolve_header(&self, block_hash: Option<B256>) -> Result<BlockHeader, ProofError> {
        match block_hash {
            Some(hash) => self.header_by_hash(hash).await,
            None => {
                let latest = BlockNumberOrTag::Latest;
                let raw = self
                    .fetch_block(latest.to_string(), self.client.block_by_number(latest, false))
                    .await?;
                self.decode_header(&raw)
            }
        }
    }

    async fn fetch_block(
        &self,
        id: String,
        request: impl std::future::Future<Output = Result<Option<RpcBlockPayload>, RpcError>>,
    ) -> Result<RpcBlockPayload, ProofError> {
        let started = Instant::now();
        let response = request.await;
        self.metrics.record_block_fetch(started.elapsed());

        let block = self.track_upstream(response)?;
        self.track(block.ok_or(MalformedPayload::BlockNotFound(id)))
    }

    async fn proof_at(
        &self,
        address: Address,
        storage_keys: Vec<B256>,
        number: u64,
    ) -> Result<RpcProofPayload, ProofError> {
        let started = Instant::now();
        let response =
            self.client.get_proof(address, storage_keys, BlockNumberOrTag::Number(number)).await;
        self.metrics.record_proof_fetch(started.elapsed());
        let proof = self.track_upstream(response)?;
        self.track(proof.ok_or(MalformedPayload::MissingField(ACCOUNT_PROOF)))
    }

    fn decode_account_proof(&self, proof: &RpcProofPayload) -> Result<AccountProof, ProofError> {
        let nodes = proof.account_proof.as_deref();
        let nodes = self.track(nodes.ok_or(MalformedPayload::MissingField(ACCOUNT_PROOF)))?;
        self.track(AccountProof::decode(nodes))
    }

    fn decode_header(&self, raw: &RpcBlockPayload) -> Result<BlockHeader, ProofError> {
        self.track(self.variant.decode(raw))
    }

    fn track<T>(&self, result: Result<T, MalformedPayload>) -> Result<T, ProofError> {
        result.map_err(|err| {
            warn!(target: "eth_proof::retriever", variant = ?self.variant, %err, "Malformed payload");
            self.metrics.record_malformed_payload();
            err.into()
        })
    }

    fn track_upstream<T>(&self, result: Result<T, RpcError>) -> Result<T, ProofError> {
        result.map_err(|err| {
            warn!(target: "eth_proof::retriever", %err, "RPC request failed");
            self.metrics.record_upstream_failure();
            err.into()
        })
    }
}
