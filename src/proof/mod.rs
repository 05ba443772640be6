//! Merkle-Patricia proof node sequences.
//!
//! Nodes are kept byte-for-byte as the node delivered them and in delivery order, which is
//! the root-to-leaf path. Only the outer RLP list header is inspected to tell branches from
//! leaf/extension nodes; key paths are never walked.

use alloy_primitives::{keccak256, Bytes, B256, U256};
use derive_more::{Deref, IntoIterator};
use serde::Serialize;

use crate::{
    error::MalformedPayload,
    primitives::{fixed, prefixed_hex, quantity_u256},
    rpc::RpcStorageProof,
};

const ACCOUNT_PROOF: &str = "accountProof";
const STORAGE_PROOF: &str = "storageProof";

/// Items in an RLP-encoded branch node.
const BRANCH_ITEMS: usize = 17;
/// Items in an RLP-encoded leaf or extension node.
const SHORT_ITEMS: usize = 2;

/// Structural shape of a proof node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofNodeKind {
    /// 17-item list: sixteen children plus a value slot.
    Branch,
    /// 2-item list: a leaf or an extension, told apart by the path prefix nibble.
    LeafOrExtension,
    /// Sentinel filler that is not a trie node at all.
    Placeholder,
}

/// One trie node in its original encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProofNode {
    raw: Bytes,
    kind: ProofNodeKind,
}

impl ProofNode {
    fn decode(proof: &'static str, index: usize, raw: &str) -> Result<Self, MalformedPayload> {
        let raw = prefixed_hex(raw)
            .map_err(|reason| MalformedPayload::InvalidProofNodeHex { proof, index, reason })?;
        let kind = classify(&raw)
            .map_err(|reason| MalformedPayload::InvalidProofNode { proof, index, reason })?;
        Ok(Self { raw, kind })
    }

    /// 32 zero bytes tagged as a placeholder.
    pub(crate) fn placeholder() -> Self {
        Self { raw: Bytes::copy_from_slice(B256::ZERO.as_slice()), kind: ProofNodeKind::Placeholder }
    }

    /// The node exactly as delivered.
    pub const fn raw(&self) -> &Bytes {
        &self.raw
    }

    pub const fn kind(&self) -> ProofNodeKind {
        self.kind
    }

    /// `keccak256` of the encoded node, the reference its parent holds.
    pub fn hash(&self) -> B256 {
        keccak256(&self.raw)
    }
}

/// Counts the items of an RLP list without interpreting them.
fn classify(bytes: &[u8]) -> Result<ProofNodeKind, String> {
    let mut buf = bytes;
    let header = alloy_rlp::Header::decode(&mut buf).map_err(|err| err.to_string())?;
    if !header.list {
        return Err("expected an RLP list".to_string());
    }
    if header.payload_length != buf.len() {
        return Err(format!(
            "list payload is {} bytes but {} remain",
            header.payload_length,
            buf.len()
        ));
    }

    let mut items = 0;
    while !buf.is_empty() {
        let item = alloy_rlp::Header::decode(&mut buf).map_err(|err| err.to_string())?;
        if item.payload_length > buf.len() {
            return Err(format!("item {items} overruns the list"));
        }
        buf = &buf[item.payload_length..];
        items += 1;
    }

    match items {
        BRANCH_ITEMS => Ok(ProofNodeKind::Branch),
        SHORT_ITEMS => Ok(ProofNodeKind::LeafOrExtension),
        other => Err(format!("list has {other} items, expected {SHORT_ITEMS} or {BRANCH_ITEMS}")),
    }
}

fn decode_nodes(proof: &'static str, raw: &[String]) -> Result<Vec<ProofNode>, MalformedPayload> {
    raw.iter().enumerate().map(|(index, node)| ProofNode::decode(proof, index, node)).collect()
}

/// Account trie proof, root first.
///
/// An empty proof is legitimate: it proves the account is absent from an empty state trie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deref, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct AccountProof(Vec<ProofNode>);

impl AccountProof {
    /// Decodes the `accountProof` array of an `eth_getProof` response.
    pub fn decode(raw: &[String]) -> Result<Self, MalformedPayload> {
        decode_nodes(ACCOUNT_PROOF, raw).map(Self)
    }

    pub(crate) fn placeholders(count: usize) -> Self {
        Self(vec![ProofNode::placeholder(); count])
    }

    pub fn nodes(&self) -> &[ProofNode] {
        &self.0
    }
}

/// Storage trie proof for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageProof {
    pub key: B256,
    pub value: U256,
    pub nodes: Vec<ProofNode>,
}

impl StorageProof {
    /// Decodes one `storageProof` entry of an `eth_getProof` response.
    pub fn decode(raw: &RpcStorageProof) -> Result<Self, MalformedPayload> {
        let key = fixed::<32>("storageProof.key", &left_pad_key(&raw.key))?;
        // Nodes report absent slots as either `0x0` or no value at all.
        let value = match raw.value.as_deref() {
            Some(value) => quantity_u256("storageProof.value", value)?,
            None => U256::ZERO,
        };
        let nodes = decode_nodes(STORAGE_PROOF, &raw.proof)?;
        Ok(Self { key, value, nodes })
    }
}

/// Storage keys come back exactly as requested, which may be a short quantity like `0x1`.
fn left_pad_key(key: &str) -> String {
    match key.strip_prefix("0x") {
        Some(digits) if digits.len() < 64 => format!("0x{digits:0>64}"),
        _ => key.to_string(),
    }
}
