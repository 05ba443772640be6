//! Canonical block headers.
//!
//! A [`BlockHeader`] is the ordered field list a chain hashes to obtain its block hash. The
//! fifteen pre-London fields are always present; post-fork fields are present only when the
//! chain variant's schedule activates them for the block. The RLP encoding is built from
//! [`BlockHeader::fields`] so ordering and presence have a single source.

mod codec;

use alloy_primitives::{keccak256, Address, Bloom, Bytes, B256, B64, U256};
use alloy_rlp::{BufMut, Encodable};
use serde::Serialize;

pub use codec::HeaderCodec;

use crate::{chainspec::ChainVariant, chainspec::PostForkField, error::HashMismatch};

/// A typed header value, encoded the way Ethereum headers encode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    /// 32-byte string.
    Hash(B256),
    /// 20-byte string.
    Address(Address),
    /// 256-byte string.
    Bloom(Bloom),
    /// Minimal big-endian integer.
    Uint(U256),
    /// Minimal big-endian integer.
    Number(u64),
    /// Variable length string.
    Bytes(Bytes),
    /// 8-byte string.
    Nonce(B64),
}

impl Encodable for HeaderValue {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Self::Hash(value) => value.encode(out),
            Self::Address(value) => value.encode(out),
            Self::Bloom(value) => value.encode(out),
            Self::Uint(value) => value.encode(out),
            Self::Number(value) => value.encode(out),
            Self::Bytes(value) => value.encode(out),
            Self::Nonce(value) => value.encode(out),
        }
    }

    fn length(&self) -> usize {
        match self {
            Self::Hash(value) => value.length(),
            Self::Address(value) => value.length(),
            Self::Bloom(value) => value.length(),
            Self::Uint(value) => value.length(),
            Self::Number(value) => value.length(),
            Self::Bytes(value) => value.length(),
            Self::Nonce(value) => value.length(),
        }
    }
}

/// One named entry of the canonical field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    /// The JSON-RPC key the value was read from.
    pub name: &'static str,
    pub value: HeaderValue,
}

impl HeaderField {
    const fn new(name: &'static str, value: HeaderValue) -> Self {
        Self { name, value }
    }
}

/// A block header in the canonical form of its chain variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    #[serde(skip)]
    variant: ChainVariant,
    #[serde(skip)]
    reported_hash: Option<B256>,
    pub parent_hash: B256,
    pub sha3_uncles: B256,
    pub miner: Address,
    pub state_root: B256,
    pub transactions_root: B256,
    pub receipts_root: B256,
    pub logs_bloom: Bloom,
    pub difficulty: U256,
    #[serde(with = "alloy_serde::quantity")]
    pub number: u64,
    #[serde(with = "alloy_serde::quantity")]
    pub gas_limit: u64,
    #[serde(with = "alloy_serde::quantity")]
    pub gas_used: u64,
    #[serde(with = "alloy_serde::quantity")]
    pub timestamp: u64,
    pub extra_data: Bytes,
    pub mix_hash: B256,
    pub nonce: B64,
    #[serde(skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub base_fee_per_gas: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawals_root: Option<B256>,
    #[serde(skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub blob_gas_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", with = "alloy_serde::quantity::opt")]
    pub excess_blob_gas: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_beacon_block_root: Option<B256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_hash: Option<B256>,
}

impl BlockHeader {
    /// The all-zero header used by sentinel results. Every post-fork field is present.
    pub(crate) fn zeroed() -> Self {
        Self {
            variant: ChainVariant::default(),
            reported_hash: None,
            parent_hash: B256::ZERO,
            sha3_uncles: B256::ZERO,
            miner: Address::ZERO,
            state_root: B256::ZERO,
            transactions_root: B256::ZERO,
            receipts_root: B256::ZERO,
            logs_bloom: Bloom::ZERO,
            difficulty: U256::ZERO,
            number: 0,
            gas_limit: 0,
            gas_used: 0,
            timestamp: 0,
            extra_data: Bytes::new(),
            mix_hash: B256::ZERO,
            nonce: B64::ZERO,
            base_fee_per_gas: Some(0),
            withdrawals_root: Some(B256::ZERO),
            blob_gas_used: Some(0),
            excess_blob_gas: Some(0),
            parent_beacon_block_root: Some(B256::ZERO),
            requests_hash: Some(B256::ZERO),
        }
    }

    /// The chain variant whose rules produced this header.
    pub const fn variant(&self) -> ChainVariant {
        self.variant
    }

    /// The block hash the node reported alongside the header, if any.
    pub const fn reported_hash(&self) -> Option<B256> {
        self.reported_hash
    }

    /// The canonical field list, in encoding order. Absent post-fork fields are skipped.
    pub fn fields(&self) -> Vec<HeaderField> {
        let mut fields = vec![
            HeaderField::new("parentHash", HeaderValue::Hash(self.parent_hash)),
            HeaderField::new("sha3Uncles", HeaderValue::Hash(self.sha3_uncles)),
            HeaderField::new("miner", HeaderValue::Address(self.miner)),
            HeaderField::new("stateRoot", HeaderValue::Hash(self.state_root)),
            HeaderField::new("transactionsRoot", HeaderValue::Hash(self.transactions_root)),
            HeaderField::new("receiptsRoot", HeaderValue::Hash(self.receipts_root)),
            HeaderField::new("logsBloom", HeaderValue::Bloom(self.logs_bloom)),
            HeaderField::new("difficulty", HeaderValue::Uint(self.difficulty)),
            HeaderField::new("number", HeaderValue::Number(self.number)),
            HeaderField::new("gasLimit", HeaderValue::Number(self.gas_limit)),
            HeaderField::new("gasUsed", HeaderValue::Number(self.gas_used)),
            HeaderField::new("timestamp", HeaderValue::Number(self.timestamp)),
            HeaderField::new("extraData", HeaderValue::Bytes(self.extra_data.clone())),
            HeaderField::new("mixHash", HeaderValue::Hash(self.mix_hash)),
            HeaderField::new("nonce", HeaderValue::Nonce(self.nonce)),
        ];

        let optional = [
            (PostForkField::BaseFeePerGas, self.base_fee_per_gas.map(HeaderValue::Number)),
            (PostForkField::WithdrawalsRoot, self.withdrawals_root.map(HeaderValue::Hash)),
            (PostForkField::BlobGasUsed, self.blob_gas_used.map(HeaderValue::Number)),
            (PostForkField::ExcessBlobGas, self.excess_blob_gas.map(HeaderValue::Number)),
            (
                PostForkField::ParentBeaconBlockRoot,
                self.parent_beacon_block_root.map(HeaderValue::Hash),
            ),
            (PostForkField::RequestsHash, self.requests_hash.map(HeaderValue::Hash)),
        ];
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(field, value)| Some(HeaderField::new(field.rpc_name(), value?))),
        );

        fields
    }

    pub(crate) const fn has_post_fork_field(&self, field: PostForkField) -> bool {
        match field {
            PostForkField::BaseFeePerGas => self.base_fee_per_gas.is_some(),
            PostForkField::WithdrawalsRoot => self.withdrawals_root.is_some(),
            PostForkField::BlobGasUsed => self.blob_gas_used.is_some(),
            PostForkField::ExcessBlobGas => self.excess_blob_gas.is_some(),
            PostForkField::ParentBeaconBlockRoot => self.parent_beacon_block_root.is_some(),
            PostForkField::RequestsHash => self.requests_hash.is_some(),
        }
    }

    /// Names of the fields that take part in the encoding, in order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields().into_iter().map(|field| field.name).collect()
    }

    /// The RLP encoding of the header.
    pub fn rlp_encoded(&self) -> Bytes {
        alloy_rlp::encode(self).into()
    }

    /// `keccak256` of the RLP encoding, i.e. the block hash.
    pub fn hash(&self) -> B256 {
        keccak256(self.rlp_encoded())
    }

    /// Checks the computed hash against `expected`.
    pub fn verify_hash(&self, expected: B256) -> Result<(), HashMismatch> {
        let computed = self.hash();
        if computed == expected {
            Ok(())
        } else {
            Err(HashMismatch { computed, reported: expected })
        }
    }
}

fn payload_length(fields: &[HeaderField]) -> usize {
    fields.iter().map(|field| field.value.length()).sum()
}

impl Encodable for BlockHeader {
    fn encode(&self, out: &mut dyn BufMut) {
        let fields = self.fields();
        alloy_rlp::Header { list: true, payload_length: payload_length(&fields) }.encode(out);
        for field in &fields {
            field.value.encode(out);
        }
    }

    fn length(&self) -> usize {
        let payload_length = payload_length(&self.fields());
        payload_length + alloy_rlp::length_of_length(payload_length)
    }
}

impl From<&BlockHeader> for alloy_consensus::Header {
    fn from(header: &BlockHeader) -> Self {
        Self {
            parent_hash: header.parent_hash,
            ommers_hash: header.sha3_uncles,
            beneficiary: header.miner,
            state_root: header.state_root,
            transactions_root: header.transactions_root,
            receipts_root: header.receipts_root,
            logs_bloom: header.logs_bloom,
            difficulty: header.difficulty,
            number: header.number,
            gas_limit: header.gas_limit,
            gas_used: header.gas_used,
            timestamp: header.timestamp,
            extra_data: header.extra_data.clone(),
            mix_hash: header.mix_hash,
            nonce: header.nonce,
            base_fee_per_gas: header.base_fee_per_gas,
            withdrawals_root: header.withdrawals_root,
            blob_gas_used: header.blob_gas_used,
            excess_blob_gas: header.excess_blob_gas,
            parent_beacon_block_root: header.parent_beacon_block_root,
            requests_hash: header.requests_hash,
        }
    }
}
