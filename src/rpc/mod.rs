//! The JSON-RPC surface the retriever depends on.
//!
//! [`EthProofRpc`] is the whole contract: three `eth_*` calls returning raw payloads. The
//! HTTP implementation is a thin `jsonrpsee` client with no retry or backoff of its own;
//! timeouts and retries belong to whatever transport the caller plugs in.

mod types;

use alloy_eips::BlockNumberOrTag;
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use jsonrpsee::{
    core::client::ClientT,
    http_client::{HeaderMap, HeaderValue, HttpClient, HttpClientBuilder},
    rpc_params,
};
use tracing::trace;

pub use types::{RpcBlockPayload, RpcProofPayload, RpcStorageProof};

use crate::{error::RpcError, version::client_version_string};

/// Block and proof queries needed to assemble a proof.
#[async_trait]
pub trait EthProofRpc: Send + Sync {
    /// `eth_getBlockByHash`. `None` when the node does not know the block.
    async fn block_by_hash(
        &self,
        hash: B256,
        full_transactions: bool,
    ) -> Result<Option<RpcBlockPayload>, RpcError>;

    /// `eth_getBlockByNumber`. `None` when the node does not know the block.
    async fn block_by_number(
        &self,
        block: BlockNumberOrTag,
        full_transactions: bool,
    ) -> Result<Option<RpcBlockPayload>, RpcError>;

    /// `eth_getProof` for `address` and `storage_keys` at `block`. `None` when the node
    /// answers `null`.
    async fn get_proof(
        &self,
        address: Address,
        storage_keys: Vec<B256>,
        block: BlockNumberOrTag,
    ) -> Result<Option<RpcProofPayload>, RpcError>;
}

/// [`EthProofRpc`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEthProofRpc {
    client: HttpClient,
}

impl HttpEthProofRpc {
    /// Builds a client for `url`.
    pub fn new(url: &str) -> Result<Self, RpcError> {
        let invalid = |reason: String| RpcError::InvalidEndpoint { url: url.to_string(), reason };

        let mut headers = HeaderMap::new();
        let user_agent =
            HeaderValue::from_str(client_version_string()).map_err(|err| invalid(err.to_string()))?;
        headers.insert("user-agent", user_agent);

        let client = HttpClientBuilder::default()
            .set_headers(headers)
            .build(url)
            .map_err(|err| invalid(err.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl EthProofRpc for HttpEthProofRpc {
    async fn block_by_hash(
        &self,
        hash: B256,
        full_transactions: bool,
    ) -> Result<Option<RpcBlockPayload>, RpcError> {
        trace!(target: "eth_proof::rpc", %hash, "eth_getBlockByHash");
        Ok(self.client.request("eth_getBlockByHash", rpc_params![hash, full_transactions]).await?)
    }

    async fn block_by_number(
        &self,
        block: BlockNumberOrTag,
        full_transactions: bool,
    ) -> Result<Option<RpcBlockPayload>, RpcError> {
        trace!(target: "eth_proof::rpc", %block, "eth_getBlockByNumber");
        Ok(self.client.request("eth_getBlockByNumber", rpc_params![block, full_transactions]).await?)
    }

    async fn get_proof(
        &self,
        address: Address,
        storage_keys: Vec<B256>,
        block: BlockNumberOrTag,
    ) -> Result<Option<RpcProofPayload>, RpcError> {
        trace!(
            target: "eth_proof::rpc",
            %address,
            storage_keys = storage_keys.len(),
            %block,
            "eth_getProof"
        );
        Ok(self.client.request("eth_getProof", rpc_params![address, storage_keys, block]).await?)
    }
}
