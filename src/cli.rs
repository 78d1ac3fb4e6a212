//! Command-line interface parsing for the `ckan` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use ckan_client::config::{ENV_API_KEY, ENV_ENDPOINT_URL};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("Invalid query parameter '{0}', expected key=value")]
    InvalidParam(String),
}

/// Query a CKAN open-data catalog with response caching
#[derive(Parser, Debug)]
#[command(name = "ckan")]
#[command(version)]
pub struct Cli {
    /// Endpoint URL, e.g. https://data.gov.au
    #[arg(long, env = ENV_ENDPOINT_URL)]
    pub endpoint: Option<String>,

    /// API key sent as the Authorization header
    #[arg(long, env = ENV_API_KEY, hide_env_values = true)]
    pub api_key: Option<String>,

    /// API version used in /api/<version>/
    #[arg(long, default_value_t = ckan_client::config::DEFAULT_API_VERSION)]
    pub api_version: u32,

    /// Keep results in memory only, for this invocation
    #[arg(long)]
    pub no_cache: bool,

    /// Directory for cached responses (defaults to the user cache directory)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Call any action, e.g. `get action/package_show id=abc`
    Get {
        resource: String,
        /// Query parameters as key=value, in order
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Search datastore records of a resource
    Search {
        resource_id: String,
        #[arg(long)]
        q: Option<String>,
        /// JSON object of field filters
        #[arg(long)]
        filters: Option<String>,
    },
    /// Show resource metadata
    Meta { resource_id: String },
    /// Test the configured endpoint, or another one
    Test { url: Option<String> },
}

/// Parse a `key=value` argument. The value may contain further `=`.
pub fn parse_param(s: &str) -> Result<(String, String), CliError> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(CliError::InvalidParam(s.to_string())),
    }
}
