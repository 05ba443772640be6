use std::sync::Mutex;

use alloy_consensus::Header;
use alloy_eips::BlockNumberOrTag;
use alloy_primitives::{hex, Address, Bloom, Bytes, B256, B64, U256};
use async_trait::async_trait;
use eth_proof::{
    rpc::{RpcBlockPayload, RpcProofPayload, RpcStorageProof},
    EthProofRpc, RpcError,
};
use jsonrpsee::core::ClientError;

/// A request observed by [`MockRpc`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RpcCall {
    BlockByHash(B256),
    BlockByNumber(BlockNumberOrTag),
    GetProof { address: Address, storage_keys: Vec<B256>, block: BlockNumberOrTag },
}

/// In-memory node. The last block is the chain head.
#[derive(Debug, Default)]
pub(crate) struct MockRpc {
    blocks: Vec<RpcBlockPayload>,
    proof: Option<RpcProofPayload>,
    blocks_unavailable: bool,
    proofs_unavailable: bool,
    calls: Mutex<Vec<RpcCall>>,
}

#[allow(dead_code)]
impl MockRpc {
    pub(crate) fn new(blocks: Vec<RpcBlockPayload>, proof: RpcProofPayload) -> Self {
        Self { blocks, proof: Some(proof), ..Default::default() }
    }

    /// A node that answers `eth_getProof` with `null`.
    pub(crate) fn without_proof(blocks: Vec<RpcBlockPayload>) -> Self {
        Self { blocks, ..Default::default() }
    }

    pub(crate) fn with_blocks_unavailable(mut self) -> Self {
        self.blocks_unavailable = true;
        self
    }

    pub(crate) fn with_proofs_unavailable(mut self) -> Self {
        self.proofs_unavailable = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<RpcCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RpcCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EthProofRpc for MockRpc {
    async fn block_by_hash(
        &self,
        hash: B256,
        _full_transactions: bool,
    ) -> Result<Option<RpcBlockPayload>, RpcError> {
        self.record(RpcCall::BlockByHash(hash));
        if self.blocks_unavailable {
            return Err(ClientError::RequestTimeout.into());
        }
        Ok(self
            .blocks
            .iter()
            .find(|block| block.hash.as_deref().and_then(|h| h.parse::<B256>().ok()) == Some(hash))
            .cloned())
    }

    async fn block_by_number(
        &self,
        block: BlockNumberOrTag,
        _full_transactions: bool,
    ) -> Result<Option<RpcBlockPayload>, RpcError> {
        self.record(RpcCall::BlockByNumber(block));
        if self.blocks_unavailable {
            return Err(ClientError::RequestTimeout.into());
        }
        Ok(match block {
            BlockNumberOrTag::Latest => self.blocks.last().cloned(),
            BlockNumberOrTag::Number(number) => {
                let number = format!("{number:#x}");
                self.blocks.iter().find(|block| block.number.as_ref() == Some(&number)).cloned()
            }
            _ => None,
        })
    }

    async fn get_proof(
        &self,
        address: Address,
        storage_keys: Vec<B256>,
        block: BlockNumberOrTag,
    ) -> Result<Option<RpcProofPayload>, RpcError> {
        self.record(RpcCall::GetProof { address, storage_keys, block });
        if self.proofs_unavailable {
            return Err(ClientError::RequestTimeout.into());
        }
        Ok(self.proof.clone())
    }
}

/// A post-Cancun, pre-Prague mainnet header.
pub(crate) fn mainnet_header(number: u64, timestamp: u64) -> Header {
    Header {
        parent_hash: B256::with_last_byte((number % 251) as u8),
        beneficiary: Address::repeat_byte(0x95),
        state_root: B256::repeat_byte(0x21),
        transactions_root: B256::repeat_byte(0x33),
        receipts_root: B256::repeat_byte(0x44),
        logs_bloom: Bloom::repeat_byte(0x01),
        difficulty: U256::ZERO,
        number,
        gas_limit: 30_000_000,
        gas_used: 14_000_000,
        timestamp,
        extra_data: Bytes::from_static(b"rsync-builder.xyz"),
        mix_hash: B256::repeat_byte(0x55),
        nonce: B64::ZERO,
        base_fee_per_gas: Some(19_000_000_000),
        withdrawals_root: Some(B256::repeat_byte(0x66)),
        blob_gas_used: Some(262_144),
        excess_blob_gas: Some(0),
        parent_beacon_block_root: Some(B256::repeat_byte(0x77)),
        ..Default::default()
    }
}

/// A BSC mainnet header after Tycho and before Bohr: blob gas fields, no beacon root.
pub(crate) fn bsc_tycho_header() -> Header {
    Header {
        beneficiary: Address::repeat_byte(0x72),
        state_root: B256::repeat_byte(0x2b),
        number: 39_600_000,
        timestamp: 1_719_000_000,
        difficulty: U256::from(2),
        gas_limit: 140_000_000,
        gas_used: 5_000_000,
        extra_data: vec![0xd8; 97].into(),
        base_fee_per_gas: Some(0),
        withdrawals_root: Some(alloy_consensus::constants::EMPTY_WITHDRAWALS),
        blob_gas_used: Some(0),
        excess_blob_gas: Some(0),
        ..Default::default()
    }
}

fn rlp_list(items: &[&[u8]]) -> Vec<u8> {
    let payload_length = items.iter().map(|item| alloy_rlp::Encodable::length(item)).sum();
    let mut out = Vec::new();
    alloy_rlp::Header { list: true, payload_length }.encode(&mut out);
    for item in items {
        alloy_rlp::Encodable::encode(item, &mut out);
    }
    out
}

/// A 17-item branch node with one populated child.
pub(crate) fn branch_node() -> Bytes {
    let child = [0xabu8; 32];
    let mut items: Vec<&[u8]> = vec![&child];
    items.extend(std::iter::repeat_n(&[][..], 16));
    rlp_list(&items).into()
}

/// A 2-item leaf node.
pub(crate) fn leaf_node(value: &[u8]) -> Bytes {
    let path: &[u8] = &[0x20, 0x0f, 0x3c];
    rlp_list(&[path, value]).into()
}

/// An `eth_getProof` response carrying `nodes` as the account proof.
pub(crate) fn proof_payload(nodes: &[Bytes]) -> RpcProofPayload {
    RpcProofPayload {
        account_proof: Some(nodes.iter().map(hex::encode_prefixed).collect()),
        ..Default::default()
    }
}

/// Adds a storage proof entry for `slot` holding `value`.
#[allow(dead_code)]
pub(crate) fn with_storage(
    mut proof: RpcProofPayload,
    slot: B256,
    value: u64,
    nodes: &[Bytes],
) -> RpcProofPayload {
    proof.storage_proof.push(RpcStorageProof {
        key: slot.to_string(),
        value: Some(format!("{value:#x}")),
        proof: nodes.iter().map(hex::encode_prefixed).collect(),
    });
    proof
}
