//! `ckan` - query a CKAN catalog from the command line, with cached responses.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ckan_client::{
    ApiResponse, CacheStore, CkanClient, CkanError, CkanService, ClientConfig, ConnectionStatus,
    FileCache, MemoryCache, Query,
};

use cli::{Cli, Command};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let endpoint = cli.endpoint.clone().ok_or(CkanError::MissingEndpoint)?;
    let mut config = ClientConfig::new(endpoint).with_api_version(cli.api_version);
    if let Some(key) = cli.api_key.clone().filter(|k| !k.is_empty()) {
        config = config.with_api_key(key);
    }
    Ok(config.validate()?)
}

fn build_cache(cli: &Cli) -> Result<Arc<dyn CacheStore>> {
    if cli.no_cache {
        return Ok(Arc::new(MemoryCache::new()));
    }
    let cache = match &cli.cache_dir {
        Some(dir) => FileCache::with_dir(dir.clone()),
        None => FileCache::new()?,
    };
    Ok(Arc::new(cache))
}

fn print_response(response: &ApiResponse) -> Result<()> {
    let json = serde_json::to_string_pretty(response).context("serializing response")?;
    println!("{}", json);
    Ok(())
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = build_config(&cli)?;
    let cache = build_cache(&cli)?;
    let client = CkanClient::new(&config, cache).context("creating HTTP client")?;
    let service = CkanService::new(client);

    let response = match &cli.command {
        Command::Get { resource, params } => {
            let query: Query = params.iter().cloned().collect();
            service.client().get(resource, query).await
        }
        Command::Search {
            resource_id,
            q,
            filters,
        } => {
            service
                .request_records(resource_id, q.as_deref(), filters.as_deref())
                .await
        }
        Command::Meta { resource_id } => service.request_meta(resource_id).await,
        Command::Test { url } => {
            let response = match url {
                Some(url) => service.test_endpoint(url).await,
                None => service.test_connection().await,
            };
            let status = ConnectionStatus::from_response(&response);
            println!("{}", status.display());
            return Ok(if status.is_connected() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
    };

    print_response(&response)?;
    Ok(if response.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    run(cli).await
}
