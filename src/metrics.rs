//! Prometheus metrics for proof retrieval.

use std::time::Duration;

use reth_metrics::metrics::{self, Counter, Histogram};

/// RPC latency and failure counters of a [`crate::ProofRetriever`].
#[derive(Debug, Clone)]
pub struct ProofFetchMetrics {
    block_fetch_latency: Histogram,
    proof_fetch_latency: Histogram,
    upstream_failures: Counter,
    malformed_payloads: Counter,
}

impl ProofFetchMetrics {
    pub fn new() -> Self {
        Self {
            block_fetch_latency: metrics::histogram!(
                "eth_proof_rpc_duration_seconds",
                "call" => "getBlock"
            ),
            proof_fetch_latency: metrics::histogram!(
                "eth_proof_rpc_duration_seconds",
                "call" => "getProof"
            ),
            upstream_failures: metrics::counter!(
                "eth_proof_failures_total",
                "kind" => "upstream_unavailable"
            ),
            malformed_payloads: metrics::counter!(
                "eth_proof_failures_total",
                "kind" => "malformed_payload"
            ),
        }
    }

    pub fn record_block_fetch(&self, duration: Duration) {
        self.block_fetch_latency.record(duration.as_secs_f64());
    }

    pub fn record_proof_fetch(&self, duration: Duration) {
        self.proof_fetch_latency.record(duration.as_secs_f64());
    }

    pub fn record_upstream_failure(&self) {
        self.upstream_failures.increment(1);
    }

    pub fn record_malformed_payload(&self) {
        self.malformed_payloads.increment(1);
    }
}

impl Default for ProofFetchMetrics {
    fn default() -> Self {
        Self::new()
    }
}
