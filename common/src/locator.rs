/// URI scheme for content-addressed locators.
pub const IPFS_SCHEME: &str = "ipfs://";

/// Public HTTP gateway used when none is configured.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Turn a token locator into something an HTTP client can GET.
///
/// `ipfs://<path>` becomes `<gateway><path>`; every other locator is returned
/// unchanged. `gateway` is expected to end with `/`.
pub fn resolve_locator(locator: &str, gateway: &str) -> String {
    match locator.strip_prefix(IPFS_SCHEME) {
        Some(path) => format!("{gateway}{path}"),
        None => locator.to_string(),
    }
}
