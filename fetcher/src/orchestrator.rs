use common::{Metadata, TokenId};
use std::path::PathBuf;

use crate::config::Config;
use crate::gateway::MetadataClient;
use crate::presenter;
use crate::rpc::RpcClient;

/// Steps of a single fetch run. `Done` and `Failed` are terminal.
#[derive(Debug)]
pub enum Stage {
    Init,
    FetchName,
    FetchTokenUri,
    FetchMetadata { uri: String },
    RenderAndPersist { metadata: Metadata },
    Done { output: PathBuf },
    Failed { step: FailedStep },
}

/// The step a failed run stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStep {
    TokenUri,
    Metadata,
    Persist,
}

/// What a run found and where it ended.
#[derive(Debug, Default)]
pub struct RunReport {
    pub collection_name: Option<String>,
    pub total_supply: Option<TokenId>,
    pub token_uri: Option<String>,
    pub metadata: Option<Metadata>,
    pub output: Option<PathBuf>,
    pub failed: Option<FailedStep>,
}

pub struct Orchestrator<'a> {
    config: &'a Config,
    rpc: RpcClient,
    metadata: MetadataClient,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a Config) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            rpc: RpcClient::new(&config.rpc_url, config.contract, config.request_timeout)?,
            metadata: MetadataClient::new(&config.ipfs_gateway, config.request_timeout)?,
        })
    }

    /// Drive the run from `Init` to a terminal stage. Never fails: every
    /// problem is logged and reflected in the report.
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        let mut stage = Stage::Init;

        loop {
            tracing::debug!("Entering stage {:?}", stage);
            stage = match stage {
                Stage::Done { output } => {
                    report.output = Some(output);
                    break;
                }
                Stage::Failed { step } => {
                    report.failed = Some(step);
                    break;
                }
                other => self.step(other, &mut report).await,
            };
        }

        println!("\n{}", "=".repeat(presenter::RULE_WIDTH));
        println!("\nTo fetch other tokens, set TOKEN_ID (and CONTRACT_ADDRESS / RPC_URL for other collections)");
        report
    }

    async fn step(&self, stage: Stage, report: &mut RunReport) -> Stage {
        match stage {
            Stage::Init => {
                println!("{}", presenter::banner("NFT METADATA FETCHER"));
                println!("Contract: {}", self.config.contract);
                println!("Chain: {}", self.config.network.label());
                Stage::FetchName
            }
            Stage::FetchName => {
                println!("\nFetching collection info...");
                report.collection_name = self.rpc.collection_name().await;
                match &report.collection_name {
                    Some(name) => println!("Collection Name: {name}"),
                    None => tracing::warn!("Collection name unavailable, continuing"),
                }
                report.total_supply = self.rpc.total_supply().await;
                if let Some(supply) = &report.total_supply {
                    println!("Total Supply: {supply}");
                }
                Stage::FetchTokenUri
            }
            Stage::FetchTokenUri => {
                let token_id = &self.config.token_id;
                println!("\nFetching metadata for Token ID #{token_id}...");
                match self.rpc.token_uri(token_id).await {
                    Some(uri) => {
                        println!("Token URI: {uri}");
                        report.token_uri = Some(uri.clone());
                        Stage::FetchMetadata { uri }
                    }
                    None => {
                        println!("Failed to fetch token URI");
                        Stage::Failed {
                            step: FailedStep::TokenUri,
                        }
                    }
                }
            }
            Stage::FetchMetadata { uri } => {
                println!("\nFetching metadata JSON...");
                match self.metadata.fetch_locator(&uri).await {
                    Some(metadata) => Stage::RenderAndPersist { metadata },
                    None => {
                        println!("Failed to fetch metadata JSON");
                        Stage::Failed {
                            step: FailedStep::Metadata,
                        }
                    }
                }
            }
            Stage::RenderAndPersist { metadata } => {
                println!("{}", presenter::render(&metadata, &self.config.ipfs_gateway));
                let persisted = presenter::persist(
                    &metadata,
                    &self.config.token_id,
                    &self.config.output_dir,
                    &self.config.output_prefix,
                );
                report.metadata = Some(metadata);
                match persisted {
                    Ok(output) => {
                        println!("\n✓ Full metadata saved to: {}", output.display());
                        Stage::Done { output }
                    }
                    Err(e) => {
                        tracing::error!("Failed to save metadata: {:#}", e);
                        Stage::Failed {
                            step: FailedStep::Persist,
                        }
                    }
                }
            }
            terminal @ (Stage::Done { .. } | Stage::Failed { .. }) => terminal,
        }
    }
}
