//! eth-proof CLI entry point

use alloy_primitives::{Address, B256};
use clap::Parser;
use eth_proof::{empty_proof, BlockHeader, ProofRetriever, RetrieverConfig};
use eyre::WrapErr;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch a block-pinned account proof")]
struct Args {
    /// JSON-RPC endpoint of the node to query. Falls back to `ETH_PROOF_RPC_URL`.
    #[arg(long)]
    rpc_url: Option<String>,

    /// Chain id selecting the header variant. Falls back to `ETH_PROOF_CHAIN_ID`, then 1.
    /// Unknown ids take post-fork fields from the payload.
    #[arg(long)]
    chain_id: Option<u64>,

    /// Account to prove.
    #[arg(long, required_unless_present = "empty")]
    address: Option<Address>,

    /// Pin to this block instead of the latest one.
    #[arg(long)]
    block_hash: Option<B256>,

    /// Also prove this storage slot of the account.
    #[arg(long)]
    storage_slot: Option<B256>,

    /// Fail unless the decoded header hashes to the reported block hash.
    #[arg(long)]
    verify_header: bool,

    /// Print the placeholder result without contacting a node.
    #[arg(long)]
    empty: bool,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}

fn verify(header: &BlockHeader) -> eyre::Result<()> {
    let reported = header
        .reported_hash()
        .ok_or_else(|| eyre::eyre!("node did not report a block hash to verify against"))?;
    header.verify_hash(reported)?;
    info!(target: "eth_proof::cli", number = header.number, hash = %reported, "Header hash verified");
    Ok(())
}

fn header_summary(header: &BlockHeader) -> serde_json::Value {
    json!({
        "variant": header.variant(),
        "hash": header.hash(),
        "rlp": header.rlp_encoded(),
        "fields": header.field_names(),
    })
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing();
    let args = Args::parse();

    if args.empty {
        let sentinel = empty_proof();
        let output = json!({ "header": header_summary(sentinel.header()), "result": sentinel });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let address = args.address.ok_or_else(|| eyre::eyre!("--address is required"))?;
    let config = RetrieverConfig::from_env_with(args.rpc_url, args.chain_id)
        .wrap_err("--rpc-url not given")?;
    let retriever = ProofRetriever::from_config(&config).wrap_err("failed to create RPC client")?;

    info!(
        target: "eth_proof::cli",
        variant = ?retriever.variant(),
        %address,
        block_hash = ?args.block_hash,
        "Fetching proof"
    );

    let output = match args.storage_slot {
        Some(slot) => {
            let result = retriever.fetch_storage_proof(address, slot, args.block_hash).await?;
            if args.verify_header {
                verify(&result.header)?;
            }
            json!({ "header": header_summary(&result.header), "result": result })
        }
        None => {
            let result = retriever.fetch_account_proof(address, args.block_hash).await?;
            if args.verify_header {
                verify(result.header())?;
            }
            json!({ "header": header_summary(result.header()), "result": result })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
