//! Client identity helpers.

use std::sync::OnceLock;

const DEFAULT_NAME: &str = "eth-proof";

static CLIENT_VERSION: OnceLock<String> = OnceLock::new();

/// Returns the version string sent as the HTTP `User-Agent` of RPC requests.
pub fn client_version_string() -> &'static str {
    CLIENT_VERSION.get_or_init(|| {
        let sha = option_env!("VERGEN_GIT_SHA_SHORT").unwrap_or("unknown");
        format!("{DEFAULT_NAME}/v{}-{sha}", env!("CARGO_PKG_VERSION"))
    })
}
