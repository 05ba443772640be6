//! Retriever configuration.
//!
//! There is deliberately no built-in endpoint: pointing a mainnet-configured retriever at
//! some default URL of another chain would silently produce headers that never verify.

use eyre::OptionExt;
use tracing::{info, warn};

use crate::chainspec::{ChainVariant, MAINNET_CHAIN_ID};

/// Env var holding the JSON-RPC endpoint URL.
pub const ENV_RPC_URL: &str = "ETH_PROOF_RPC_URL";
/// Env var holding the numeric chain id.
pub const ENV_CHAIN_ID: &str = "ETH_PROOF_CHAIN_ID";

/// Endpoint and chain selection, fixed for the lifetime of a retriever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrieverConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Chain id used to select the header variant.
    pub chain_id: u64,
}

impl RetrieverConfig {
    pub fn new(rpc_url: impl Into<String>, chain_id: u64) -> Self {
        Self { rpc_url: rpc_url.into(), chain_id }
    }

    /// Loads config from environment variables, with explicitly given values taking
    /// precedence. The URL is required; the chain id falls back to mainnet.
    pub fn from_env_with(rpc_url: Option<String>, chain_id: Option<u64>) -> eyre::Result<Self> {
        Self::from_lookup(overriding(rpc_url, chain_id, |var| std::env::var(var).ok()))
    }

    /// Loads config through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let rpc_url = lookup(ENV_RPC_URL)
            .filter(|url| !url.trim().is_empty())
            .ok_or_eyre(format!("{ENV_RPC_URL} must be set to a JSON-RPC endpoint"))?;
        let chain_id = match lookup(ENV_CHAIN_ID) {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(
                        target: "eth_proof::config",
                        env_var = ENV_CHAIN_ID,
                        raw_value = %value,
                        %err,
                        fallback = MAINNET_CHAIN_ID,
                        "Invalid chain id env var, using default"
                    );
                    MAINNET_CHAIN_ID
                }
            },
            None => MAINNET_CHAIN_ID,
        };

        let config = Self { rpc_url, chain_id };
        info!(target: "eth_proof::config", chain_id, "Configured proof retriever");
        Ok(config)
    }

    /// The header variant this config selects.
    pub fn variant(&self) -> ChainVariant {
        ChainVariant::resolve(self.chain_id)
    }
}

/// Answers `ENV_RPC_URL` and `ENV_CHAIN_ID` from the given values before `fallback`.
fn overriding(
    rpc_url: Option<String>,
    chain_id: Option<u64>,
    fallback: impl Fn(&str) -> Option<String>,
) -> impl Fn(&str) -> Option<String> {
    let chain_id = chain_id.map(|id| id.to_string());
    move |var| {
        let explicit = match var {
            ENV_RPC_URL => rpc_url.clone(),
            ENV_CHAIN_ID => chain_id.clone(),
            _ => None,
        };
        explicit.or_else(|| fallback(var))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn requires_rpc_url() {
        assert!(RetrieverConfig::from_lookup(lookup(&[])).is_err());
        assert!(RetrieverConfig::from_lookup(lookup(&[(ENV_RPC_URL, "  ")])).is_err());
    }

    #[test]
    fn reads_url_and_chain_id() {
        let config = RetrieverConfig::from_lookup(lookup(&[
            (ENV_RPC_URL, "http://localhost:8545"),
            (ENV_CHAIN_ID, "56"),
        ]))
        .unwrap();
        assert_eq!(config, RetrieverConfig::new("http://localhost:8545", 56));
        assert_eq!(config.variant(), ChainVariant::BscMainnet);
    }

    #[test]
    fn invalid_chain_id_falls_back_to_mainnet() {
        let config = RetrieverConfig::from_lookup(lookup(&[
            (ENV_RPC_URL, "http://localhost:8545"),
            (ENV_CHAIN_ID, "bsc"),
        ]))
        .unwrap();
        assert_eq!(config.chain_id, MAINNET_CHAIN_ID);
    }

    #[test]
    fn explicit_values_override_the_environment() {
        let env = || lookup(&[(ENV_RPC_URL, "http://env:8545"), (ENV_CHAIN_ID, "97")]);

        let config =
            RetrieverConfig::from_lookup(overriding(Some("http://cli:8545".into()), None, env()))
                .unwrap();
        assert_eq!(config, RetrieverConfig::new("http://cli:8545", 97));

        let config = RetrieverConfig::from_lookup(overriding(None, Some(56), env())).unwrap();
        assert_eq!(config, RetrieverConfig::new("http://env:8545", 56));

        let err = RetrieverConfig::from_lookup(overriding(None, None, lookup(&[]))).unwrap_err();
        assert!(err.to_string().contains(ENV_RPC_URL));
    }

    #[test]
    fn from_env_with_explicit_url_needs_no_environment() {
        let config =
            RetrieverConfig::from_env_with(Some("http://localhost:8545".into()), Some(10)).unwrap();
        assert_eq!(config, RetrieverConfig::new("http://localhost:8545", 10));
        assert_eq!(config.variant(), ChainVariant::Generic);
    }
}
