//! Chain variants and their header-field activation schedules.
//!
//! Every supported chain shares the same fifteen pre-London header fields. What differs is
//! which post-fork fields a header carries and from which block/timestamp on. Each
//! [`ChainVariant`] owns a [`HeaderFieldSchedule`] that answers that question for a given
//! block, so header decoding never has to guess from the payload's key set.
//!
//! Chains without a dedicated variant use [`ChainVariant::Generic`], whose schedule reads
//! presence from the payload instead.

use serde::Serialize;
use tracing::{debug, warn};

/// Ethereum mainnet chain id.
pub const MAINNET_CHAIN_ID: u64 = 1;
/// Goerli testnet chain id.
pub const GOERLI_CHAIN_ID: u64 = 5;
/// Sepolia testnet chain id.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;
/// BNB Smart Chain mainnet chain id.
pub const BSC_MAINNET_CHAIN_ID: u64 = 56;
/// BNB Smart Chain testnet (Chapel) chain id.
pub const BSC_TESTNET_CHAIN_ID: u64 = 97;

/// When a fork (and therefore a header field) becomes active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Never active on this chain.
    Never,
    /// Active from this block number on (pre-merge style forks).
    Block(u64),
    /// Active from this block timestamp on.
    Timestamp(u64),
    /// Not tied to a height: the field is present exactly when the payload carries it.
    FromPayload,
}

impl Activation {
    /// Returns `true` if the fork is active for a block with the given number and timestamp.
    ///
    /// [`Activation::FromPayload`] is never active by height.
    pub const fn is_active(self, number: u64, timestamp: u64) -> bool {
        match self {
            Self::Never | Self::FromPayload => false,
            Self::Block(block) => number >= block,
            Self::Timestamp(time) => timestamp >= time,
        }
    }
}

/// A fork rule gating one optional header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForkRule {
    /// Human readable fork name, used in errors and logs.
    pub fork: &'static str,
    /// When the fork activates.
    pub activation: Activation,
}

impl ForkRule {
    const fn new(fork: &'static str, activation: Activation) -> Self {
        Self { fork, activation }
    }

    const fn never(fork: &'static str) -> Self {
        Self { fork, activation: Activation::Never }
    }

    const fn from_payload(fork: &'static str) -> Self {
        Self { fork, activation: Activation::FromPayload }
    }
}

/// Header fields that only exist after a fork, in canonical RLP order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostForkField {
    BaseFeePerGas,
    WithdrawalsRoot,
    BlobGasUsed,
    ExcessBlobGas,
    ParentBeaconBlockRoot,
    RequestsHash,
}

impl PostForkField {
    /// All post-fork fields in the order they are appended to the header list.
    pub const ALL: [Self; 6] = [
        Self::BaseFeePerGas,
        Self::WithdrawalsRoot,
        Self::BlobGasUsed,
        Self::ExcessBlobGas,
        Self::ParentBeaconBlockRoot,
        Self::RequestsHash,
    ];

    /// The JSON-RPC key of this field.
    pub const fn rpc_name(self) -> &'static str {
        match self {
            Self::BaseFeePerGas => "baseFeePerGas",
            Self::WithdrawalsRoot => "withdrawalsRoot",
            Self::BlobGasUsed => "blobGasUsed",
            Self::ExcessBlobGas => "excessBlobGas",
            Self::ParentBeaconBlockRoot => "parentBeaconBlockRoot",
            Self::RequestsHash => "requestsHash",
        }
    }
}

/// Per-chain activation rules for every optional header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFieldSchedule {
    pub base_fee_per_gas: ForkRule,
    pub withdrawals_root: ForkRule,
    /// Gates both `blobGasUsed` and `excessBlobGas`.
    pub blob_gas: ForkRule,
    pub parent_beacon_block_root: ForkRule,
    pub requests_hash: ForkRule,
}

impl HeaderFieldSchedule {
    /// Returns the rule gating `field`.
    pub const fn rule(&self, field: PostForkField) -> ForkRule {
        match field {
            PostForkField::BaseFeePerGas => self.base_fee_per_gas,
            PostForkField::WithdrawalsRoot => self.withdrawals_root,
            PostForkField::BlobGasUsed | PostForkField::ExcessBlobGas => self.blob_gas,
            PostForkField::ParentBeaconBlockRoot => self.parent_beacon_block_root,
            PostForkField::RequestsHash => self.requests_hash,
        }
    }

    /// Returns `true` if `field` belongs in the header of the given block.
    pub const fn includes(&self, field: PostForkField, number: u64, timestamp: u64) -> bool {
        self.rule(field).activation.is_active(number, timestamp)
    }
}

const MAINNET_SCHEDULE: HeaderFieldSchedule = HeaderFieldSchedule {
    base_fee_per_gas: ForkRule::new("London", Activation::Block(12_965_000)),
    withdrawals_root: ForkRule::new("Shanghai", Activation::Timestamp(1_681_338_455)),
    blob_gas: ForkRule::new("Cancun", Activation::Timestamp(1_710_338_135)),
    parent_beacon_block_root: ForkRule::new("Cancun", Activation::Timestamp(1_710_338_135)),
    requests_hash: ForkRule::new("Prague", Activation::Timestamp(1_746_612_311)),
};

const GOERLI_SCHEDULE: HeaderFieldSchedule = HeaderFieldSchedule {
    base_fee_per_gas: ForkRule::new("London", Activation::Block(5_062_605)),
    withdrawals_root: ForkRule::new("Shanghai", Activation::Timestamp(1_678_832_736)),
    blob_gas: ForkRule::new("Cancun", Activation::Timestamp(1_705_473_120)),
    parent_beacon_block_root: ForkRule::new("Cancun", Activation::Timestamp(1_705_473_120)),
    // Goerli was retired before Prague.
    requests_hash: ForkRule::never("Prague"),
};

const SEPOLIA_SCHEDULE: HeaderFieldSchedule = HeaderFieldSchedule {
    base_fee_per_gas: ForkRule::new("London", Activation::Block(0)),
    withdrawals_root: ForkRule::new("Shanghai", Activation::Timestamp(1_677_557_088)),
    blob_gas: ForkRule::new("Cancun", Activation::Timestamp(1_706_655_072)),
    parent_beacon_block_root: ForkRule::new("Cancun", Activation::Timestamp(1_706_655_072)),
    requests_hash: ForkRule::new("Prague", Activation::Timestamp(1_741_159_776)),
};

// Mainnet header layout with no known activation points.
const GENERIC_SCHEDULE: HeaderFieldSchedule = HeaderFieldSchedule {
    base_fee_per_gas: ForkRule::from_payload("London"),
    withdrawals_root: ForkRule::from_payload("Shanghai"),
    blob_gas: ForkRule::from_payload("Cancun"),
    parent_beacon_block_root: ForkRule::from_payload("Cancun"),
    requests_hash: ForkRule::from_payload("Prague"),
};

// BSC skipped withdrawals at Kepler: `withdrawalsRoot` only appears with the blob fields at
// Tycho, and the (always zero) parent beacon root arrives one fork later at Bohr.
const BSC_MAINNET_SCHEDULE: HeaderFieldSchedule = HeaderFieldSchedule {
    base_fee_per_gas: ForkRule::new("Hertz", Activation::Block(31_302_048)),
    withdrawals_root: ForkRule::new("Tycho", Activation::Timestamp(1_718_863_500)),
    blob_gas: ForkRule::new("Tycho", Activation::Timestamp(1_718_863_500)),
    parent_beacon_block_root: ForkRule::new("Bohr", Activation::Timestamp(1_727_317_200)),
    requests_hash: ForkRule::new("Pascal", Activation::Timestamp(1_742_436_600)),
};

const BSC_TESTNET_SCHEDULE: HeaderFieldSchedule = HeaderFieldSchedule {
    base_fee_per_gas: ForkRule::new("Hertz", Activation::Block(31_103_030)),
    withdrawals_root: ForkRule::new("Tycho", Activation::Timestamp(1_713_330_442)),
    blob_gas: ForkRule::new("Tycho", Activation::Timestamp(1_713_330_442)),
    parent_beacon_block_root: ForkRule::new("Bohr", Activation::Timestamp(1_724_116_996)),
    requests_hash: ForkRule::new("Pascal", Activation::Timestamp(1_740_452_880)),
};

/// The closed set of header encodings this crate knows how to reproduce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainVariant {
    Mainnet,
    Goerli,
    Sepolia,
    BscMainnet,
    BscTestnet,
    /// Fallback for unrecognized chain ids: the mainnet field order, with post-fork fields
    /// taken from whatever the payload carries.
    #[default]
    Generic,
}

impl ChainVariant {
    /// Every variant, the fallback included.
    pub const ALL: [Self; 6] = [
        Self::Mainnet,
        Self::Goerli,
        Self::Sepolia,
        Self::BscMainnet,
        Self::BscTestnet,
        Self::Generic,
    ];

    /// Exact lookup; `None` for chain ids without a dedicated variant.
    pub const fn from_chain_id(chain_id: u64) -> Option<Self> {
        match chain_id {
            MAINNET_CHAIN_ID => Some(Self::Mainnet),
            GOERLI_CHAIN_ID => Some(Self::Goerli),
            SEPOLIA_CHAIN_ID => Some(Self::Sepolia),
            BSC_MAINNET_CHAIN_ID => Some(Self::BscMainnet),
            BSC_TESTNET_CHAIN_ID => Some(Self::BscTestnet),
            _ => None,
        }
    }

    /// Selects the variant for `chain_id`, falling back to [`ChainVariant::Generic`].
    ///
    /// The fallback is not an error. It may also hide a mistyped chain id, so it is logged
    /// at warn level.
    pub fn resolve(chain_id: u64) -> Self {
        match Self::from_chain_id(chain_id) {
            Some(variant) => {
                debug!(target: "eth_proof::chainspec", chain_id, ?variant, "Selected header variant");
                variant
            }
            None => {
                warn!(
                    target: "eth_proof::chainspec",
                    chain_id,
                    fallback = ?Self::Generic,
                    "Unrecognized chain id, falling back to the generic header variant"
                );
                Self::Generic
            }
        }
    }

    /// The canonical chain id of this variant; `None` for [`ChainVariant::Generic`].
    pub const fn chain_id(self) -> Option<u64> {
        match self {
            Self::Mainnet => Some(MAINNET_CHAIN_ID),
            Self::Goerli => Some(GOERLI_CHAIN_ID),
            Self::Sepolia => Some(SEPOLIA_CHAIN_ID),
            Self::BscMainnet => Some(BSC_MAINNET_CHAIN_ID),
            Self::BscTestnet => Some(BSC_TESTNET_CHAIN_ID),
            Self::Generic => None,
        }
    }

    /// The optional-field activation schedule of this variant.
    pub const fn schedule(self) -> &'static HeaderFieldSchedule {
        match self {
            Self::Mainnet => &MAINNET_SCHEDULE,
            Self::Goerli => &GOERLI_SCHEDULE,
            Self::Sepolia => &SEPOLIA_SCHEDULE,
            Self::BscMainnet => &BSC_MAINNET_SCHEDULE,
            Self::BscTestnet => &BSC_TESTNET_SCHEDULE,
            Self::Generic => &GENERIC_SCHEDULE,
        }
    }
}
