//! Raw JSON-RPC response shapes.
//!
//! Everything is kept as the hex strings the node sent. Parsing happens in the codecs so
//! that a missing or malformed field is reported by name instead of surfacing as an opaque
//! serde error.

use alloy_primitives::hex;
use serde::{Deserialize, Serialize};

/// The header-relevant subset of an `eth_getBlockBy*` response.
///
/// Keys the codecs do not need (`transactions`, `size`, `totalDifficulty`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RpcBlockPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha3_uncles: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipts_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs_bloom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mix_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawals_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob_gas_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excess_blob_gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_beacon_block_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_hash: Option<String>,
}

fn data(bytes: &[u8]) -> Option<String> {
    Some(hex::encode_prefixed(bytes))
}

fn quantity(value: u64) -> Option<String> {
    Some(format!("{value:#x}"))
}

/// Renders a consensus header the way a node returns it, with its real hash.
impl From<&alloy_consensus::Header> for RpcBlockPayload {
    fn from(header: &alloy_consensus::Header) -> Self {
        Self {
            hash: data(header.hash_slow().as_slice()),
            parent_hash: data(header.parent_hash.as_slice()),
            sha3_uncles: data(header.ommers_hash.as_slice()),
            miner: data(header.beneficiary.as_slice()),
            state_root: data(header.state_root.as_slice()),
            transactions_root: data(header.transactions_root.as_slice()),
            receipts_root: data(header.receipts_root.as_slice()),
            logs_bloom: data(header.logs_bloom.as_slice()),
            difficulty: Some(format!("0x{:x}", header.difficulty)),
            number: quantity(header.number),
            gas_limit: quantity(header.gas_limit),
            gas_used: quantity(header.gas_used),
            timestamp: quantity(header.timestamp),
            extra_data: data(&header.extra_data),
            mix_hash: data(header.mix_hash.as_slice()),
            nonce: data(header.nonce.as_slice()),
            base_fee_per_gas: header.base_fee_per_gas.and_then(quantity),
            withdrawals_root: header.withdrawals_root.and_then(|root| data(root.as_slice())),
            blob_gas_used: header.blob_gas_used.and_then(quantity),
            excess_blob_gas: header.excess_blob_gas.and_then(quantity),
            parent_beacon_block_root: header
                .parent_beacon_block_root
                .and_then(|root| data(root.as_slice())),
            requests_hash: header.requests_hash.and_then(|hash| data(hash.as_slice())),
        }
    }
}

/// An `eth_getProof` response (EIP-1186).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcProofPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_hash: Option<String>,
    /// Root-to-leaf account trie nodes, hex encoded. `None` when the node left it out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_proof: Option<Vec<String>>,
    #[serde(default)]
    pub storage_proof: Vec<RpcStorageProof>,
}

/// One entry of `storageProof` in an `eth_getProof` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcStorageProof {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub proof: Vec<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn block_payload_ignores_unrelated_keys_and_nulls() {
        let payload: RpcBlockPayload = serde_json::from_value(json!({
            "number": "0x10",
            "timestamp": "0x5f5e100",
            "baseFeePerGas": null,
            "transactions": [],
            "totalDifficulty": "0x0",
            "size": "0x220"
        }))
        .expect("payload parses");

        assert_eq!(payload.number.as_deref(), Some("0x10"));
        assert_eq!(payload.timestamp.as_deref(), Some("0x5f5e100"));
        assert_eq!(payload.base_fee_per_gas, None);
        assert_eq!(payload.parent_hash, None);
    }

    #[test]
    fn proof_payload_tolerates_missing_account_proof() {
        let missing: RpcProofPayload =
            serde_json::from_value(json!({ "balance": "0x0" })).expect("payload parses");
        assert_eq!(missing.account_proof, None);
        let null: RpcProofPayload =
            serde_json::from_value(json!({ "accountProof": null })).expect("payload parses");
        assert_eq!(null.account_proof, None);

        let payload: RpcProofPayload = serde_json::from_value(json!({
            "address": "0x0000000000000000000000000000000000000001",
            "accountProof": ["0xc0"],
            "storageProof": [{ "key": "0x01", "value": "0x0", "proof": [] }]
        }))
        .expect("payload parses");
        assert_eq!(payload.account_proof, Some(vec!["0xc0".to_string()]));
        assert_eq!(payload.storage_proof.len(), 1);
        assert!(payload.storage_proof[0].proof.is_empty());
    }

    #[test]
    fn consensus_header_renders_as_quantities_and_data() {
        let header = alloy_consensus::Header {
            number: 0x10,
            difficulty: alloy_primitives::U256::from(0x2a),
            base_fee_per_gas: Some(7),
            ..Default::default()
        };
        let payload = RpcBlockPayload::from(&header);

        assert_eq!(payload.number.as_deref(), Some("0x10"));
        assert_eq!(payload.difficulty.as_deref(), Some("0x2a"));
        assert_eq!(payload.base_fee_per_gas.as_deref(), Some("0x7"));
        assert_eq!(payload.nonce.as_deref(), Some("0x0000000000000000"));
        assert_eq!(payload.withdrawals_root, None);
        assert_eq!(payload.hash, Some(header.hash_slow().to_string()));
    }
}
