//! Runtime configuration: CLI flags resolved into a serializable config.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LISTING_URL: &str = "https://pokeapi.co/api/v2/pokemon";
pub const DEFAULT_LIMIT: usize = 150;
pub const DEFAULT_OFFSET: usize = 0;
pub const BATCH_SIZE: usize = 20;

/// Shortest (trimmed) query that triggers a search.
pub const MIN_QUERY_LEN: usize = 3;

/// Catalog flags, flattened into the binary's argument parser.
#[derive(clap::Args, Clone, Debug)]
pub struct CatalogArgs {
    /// Listing endpoint queried once at startup
    #[arg(long, default_value = DEFAULT_LISTING_URL)]
    pub listing_url: String,

    /// Number of entries requested from the listing endpoint
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Listing offset
    #[arg(long, default_value_t = DEFAULT_OFFSET)]
    pub offset: usize,

    /// Cards rendered (and details fetched) per batch
    #[arg(long, default_value_t = BATCH_SIZE, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub batch_size: usize,

    /// Write tracing output to this file (the terminal belongs to the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl CatalogArgs {
    pub fn config(&self) -> CatalogConfig {
        CatalogConfig {
            listing_url: self.listing_url.clone(),
            limit: self.limit,
            offset: self.offset,
            batch_size: self.batch_size.max(1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogConfig {
    pub listing_url: String,
    pub limit: usize,
    pub offset: usize,
    pub batch_size: usize,
}

impl CatalogConfig {
    pub fn listing_request_url(&self) -> String {
        format!(
            "{}?limit={}&offset={}",
            self.listing_url.trim_end_matches('/'),
            self.limit,
            self.offset
        )
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
            batch_size: BATCH_SIZE,
        }
    }
}
