//! RPC block payload to [`BlockHeader`] decoding.

use alloy_primitives::B256;
use tracing::debug;

use super::BlockHeader;
use crate::{
    chainspec::{Activation, ChainVariant, HeaderFieldSchedule, PostForkField},
    error::MalformedPayload,
    primitives::{data, fixed, quantity_u256, quantity_u64, required},
    rpc::RpcBlockPayload,
};

/// Turns a raw block payload into the canonical header of one chain variant.
pub trait HeaderCodec {
    /// The variant whose rules this codec applies.
    fn variant(&self) -> ChainVariant;

    /// The optional-field schedule of [`HeaderCodec::variant`].
    fn schedule(&self) -> &'static HeaderFieldSchedule {
        self.variant().schedule()
    }

    /// Decodes `raw`. Any missing, non-hex or out-of-schedule field is an error, and so is a
    /// post-fork field that follows an absent one.
    fn decode(&self, raw: &RpcBlockPayload) -> Result<BlockHeader, MalformedPayload> {
        decode_header(self.variant(), self.schedule(), raw)
    }
}

impl HeaderCodec for ChainVariant {
    fn variant(&self) -> ChainVariant {
        *self
    }
}

/// Decides whether a post-fork field belongs in a specific block's header.
struct ForkGate<'s> {
    schedule: &'s HeaderFieldSchedule,
    number: u64,
    timestamp: u64,
}

impl ForkGate<'_> {
    fn select<'a>(
        &self,
        field: PostForkField,
        value: Option<&'a String>,
    ) -> Result<Option<&'a str>, MalformedPayload> {
        let rule = self.schedule.rule(field);
        if rule.activation == Activation::FromPayload {
            return Ok(value.map(String::as_str));
        }
        let active = rule.activation.is_active(self.number, self.timestamp);
        match (active, value) {
            (true, Some(value)) => Ok(Some(value.as_str())),
            (false, None) => Ok(None),
            (true, None) => {
                Err(MalformedPayload::MissingForkField { field: field.rpc_name(), fork: rule.fork })
            }
            (false, Some(_)) => Err(MalformedPayload::UnexpectedForkField {
                field: field.rpc_name(),
                fork: rule.fork,
                number: self.number,
            }),
        }
    }

    fn quantity(
        &self,
        field: PostForkField,
        value: Option<&String>,
    ) -> Result<Option<u64>, MalformedPayload> {
        self.select(field, value)?.map(|raw| quantity_u64(field.rpc_name(), raw)).transpose()
    }

    fn hash(
        &self,
        field: PostForkField,
        value: Option<&String>,
    ) -> Result<Option<B256>, MalformedPayload> {
        self.select(field, value)?.map(|raw| fixed::<32>(field.rpc_name(), raw)).transpose()
    }
}

fn decode_header(
    variant: ChainVariant,
    schedule: &HeaderFieldSchedule,
    raw: &RpcBlockPayload,
) -> Result<BlockHeader, MalformedPayload> {
    // Number and timestamp first: they decide which post-fork fields are expected.
    let number = quantity_u64("number", required("number", raw.number.as_ref())?)?;
    let timestamp = quantity_u64("timestamp", required("timestamp", raw.timestamp.as_ref())?)?;
    let gate = ForkGate { schedule, number, timestamp };

    let reported_hash = raw.hash.as_deref().map(|hash| fixed::<32>("hash", hash)).transpose()?;

    let header = BlockHeader {
        variant,
        reported_hash,
        parent_hash: fixed("parentHash", required("parentHash", raw.parent_hash.as_ref())?)?,
        sha3_uncles: fixed("sha3Uncles", required("sha3Uncles", raw.sha3_uncles.as_ref())?)?,
        miner: fixed::<20>("miner", required("miner", raw.miner.as_ref())?)?.into(),
        state_root: fixed("stateRoot", required("stateRoot", raw.state_root.as_ref())?)?,
        transactions_root: fixed(
            "transactionsRoot",
            required("transactionsRoot", raw.transactions_root.as_ref())?,
        )?,
        receipts_root: fixed(
            "receiptsRoot",
            required("receiptsRoot", raw.receipts_root.as_ref())?,
        )?,
        logs_bloom: fixed::<256>("logsBloom", required("logsBloom", raw.logs_bloom.as_ref())?)?
            .into(),
        difficulty: quantity_u256(
            "difficulty",
            required("difficulty", raw.difficulty.as_ref())?,
        )?,
        number,
        gas_limit: quantity_u64("gasLimit", required("gasLimit", raw.gas_limit.as_ref())?)?,
        gas_used: quantity_u64("gasUsed", required("gasUsed", raw.gas_used.as_ref())?)?,
        timestamp,
        extra_data: data("extraData", required("extraData", raw.extra_data.as_ref())?)?,
        mix_hash: fixed("mixHash", required("mixHash", raw.mix_hash.as_ref())?)?,
        nonce: fixed("nonce", required("nonce", raw.nonce.as_ref())?)?,
        base_fee_per_gas: gate
            .quantity(PostForkField::BaseFeePerGas, raw.base_fee_per_gas.as_ref())?,
        withdrawals_root: gate
            .hash(PostForkField::WithdrawalsRoot, raw.withdrawals_root.as_ref())?,
        blob_gas_used: gate.quantity(PostForkField::BlobGasUsed, raw.blob_gas_used.as_ref())?,
        excess_blob_gas: gate
            .quantity(PostForkField::ExcessBlobGas, raw.excess_blob_gas.as_ref())?,
        parent_beacon_block_root: gate.hash(
            PostForkField::ParentBeaconBlockRoot,
            raw.parent_beacon_block_root.as_ref(),
        )?,
        requests_hash: gate.hash(PostForkField::RequestsHash, raw.requests_hash.as_ref())?,
    };

    check_trailing_order(&header)?;

    debug!(
        target: "eth_proof::header",
        ?variant,
        number,
        timestamp,
        fields = header.fields().len(),
        "Decoded block header"
    );

    Ok(header)
}

/// Post-fork fields are trailing optionals: once one is absent, every later one must be too.
/// Schedules of named chains guarantee this; payload-driven presence has to be checked.
fn check_trailing_order(header: &BlockHeader) -> Result<(), MalformedPayload> {
    let mut missing = None;
    for field in PostForkField::ALL {
        match (header.has_post_fork_field(field), missing) {
            (false, None) => missing = Some(field),
            (true, Some(gap)) => {
                return Err(MalformedPayload::OptionalFieldGap {
                    field: field.rpc_name(),
                    missing: gap.rpc_name(),
                })
            }
            _ => {}
        }
    }
    Ok(())
}
