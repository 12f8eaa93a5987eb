use anyhow::Context;
use common::locator::DEFAULT_IPFS_GATEWAY;
use common::{Address, TokenId};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Mibera Maker collection on Berachain.
pub const DEFAULT_CONTRACT: &str = "0x6666397dfe9a8c469bf65dc744cb1c733416c420";

pub const DEFAULT_OUTPUT_PREFIX: &str = "mibera_token";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Artio,
}

impl Network {
    pub fn default_rpc_url(self) -> &'static str {
        match self {
            Network::Mainnet => "https://rpc.berachain.com",
            Network::Artio => "https://artio.rpc.berachain.com",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Network::Mainnet => "Berachain",
            Network::Artio => "Berachain Artio (testnet)",
        }
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "artio" | "testnet" => Ok(Network::Artio),
            other => anyhow::bail!("unknown network {other:?}, expected mainnet or artio"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub network: Network,
    pub rpc_url: String,
    pub contract: Address,
    pub token_id: TokenId,
    /// Base URL that replaces `ipfs://`, always ending with `/`.
    pub ipfs_gateway: String,
    pub output_dir: PathBuf,
    pub output_prefix: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Unset and empty values fall back
    /// to the defaults; values that are set but malformed are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let network = match var("NETWORK") {
            Some(v) => v.parse::<Network>()?,
            None => Network::Mainnet,
        };

        let contract = var("CONTRACT_ADDRESS").unwrap_or_else(|| DEFAULT_CONTRACT.into());
        let contract = contract
            .parse::<Address>()
            .with_context(|| format!("invalid CONTRACT_ADDRESS {contract:?}"))?;

        let token_id = match var("TOKEN_ID") {
            Some(v) => v
                .parse::<TokenId>()
                .with_context(|| format!("invalid TOKEN_ID {v:?}"))?,
            None => TokenId::from(1),
        };

        let timeout_secs = match var("REQUEST_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid REQUEST_TIMEOUT_SECS {v:?}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            anyhow::bail!("invalid REQUEST_TIMEOUT_SECS 0, must be at least 1");
        }

        let mut ipfs_gateway = var("IPFS_GATEWAY").unwrap_or_else(|| DEFAULT_IPFS_GATEWAY.into());
        if !ipfs_gateway.ends_with('/') {
            ipfs_gateway.push('/');
        }

        Ok(Self {
            network,
            rpc_url: var("RPC_URL").unwrap_or_else(|| network.default_rpc_url().into()),
            contract,
            token_id,
            ipfs_gateway,
            output_dir: var("OUTPUT_DIR").map(PathBuf::from).unwrap_or_else(|| ".".into()),
            output_prefix: var("OUTPUT_PREFIX").unwrap_or_else(|| DEFAULT_OUTPUT_PREFIX.into()),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
