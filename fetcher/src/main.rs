mod config;
mod error;
mod gateway;
mod orchestrator;
mod presenter;
mod rpc;

#[cfg(test)]
mod test_support;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fetcher=info".parse()?)
                .add_directive("common=info".parse()?),
        )
        .init();

    let config = config::Config::from_env()?;
    tracing::debug!("Using RPC {} and gateway {}", config.rpc_url, config.ipfs_gateway);

    let report = orchestrator::Orchestrator::new(&config)?.run().await;

    match (report.failed, &report.output) {
        (None, Some(path)) => tracing::info!(
            "Saved token {} of {} (supply {}) to {}",
            config.token_id,
            report.collection_name.as_deref().unwrap_or("unknown collection"),
            report.total_supply.map_or_else(|| "unknown".to_string(), |s| s.to_string()),
            path.display()
        ),
        (failed, _) => tracing::warn!(
            "Run for token {} stopped at {:?} (uri {:?}, metadata fetched: {})",
            config.token_id,
            failed,
            report.token_uri,
            report.metadata.is_some()
        ),
    }

    Ok(())
}
