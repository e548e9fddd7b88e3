//! PokeAPI client: one listing request, then detail requests per batch.

use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::task::JoinSet;

use crate::error::FetchError;
use crate::state::{EntityDetail, EntitySummary, EntityStat};

const ARTWORK_POINTER: &str = "/other/official-artwork/front_default";

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    height: u16,
    weight: u16,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    #[serde(default)]
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: TypeName,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeName {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: TypeName,
}

/// Fetches the listing at `url` (already carrying `limit`/`offset`).
pub async fn fetch_summaries(url: &str) -> Result<Vec<EntitySummary>, FetchError> {
    let response: ListResponse = fetch_json(url).await?;
    Ok(response
        .results
        .into_iter()
        .map(|entry| EntitySummary {
            name: entry.name,
            url: entry.url,
        })
        .collect())
}

pub async fn fetch_detail(url: &str) -> Result<EntityDetail, FetchError> {
    let response: PokemonResponse = fetch_json(url).await?;
    Ok(EntityDetail {
        id: response.id,
        name: response.name,
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        stats: response
            .stats
            .into_iter()
            .map(|slot| EntityStat {
                name: slot.stat.name,
                base_stat: slot.base_stat,
            })
            .collect(),
        artwork_url: pointer_string(&response.sprites, ARTWORK_POINTER),
        height: response.height,
        weight: response.weight,
    })
}

/// Fetches every URL concurrently and returns the details in input order.
///
/// The first failure aborts the batch: the remaining requests are cancelled
/// and no partial result is returned.
pub async fn fetch_details(urls: Vec<String>) -> Result<Vec<EntityDetail>, FetchError> {
    if urls.is_empty() {
        return Ok(Vec::new());
    }

    let total = urls.len();
    let mut join_set = JoinSet::new();
    for (slot, url) in urls.into_iter().enumerate() {
        join_set.spawn(async move { (slot, fetch_detail(&url).await) });
    }

    let mut resolved: Vec<Option<EntityDetail>> = vec![None; total];
    while let Some(joined) = join_set.join_next().await {
        let (slot, result) = joined.map_err(|err| FetchError::Task(err.to_string()))?;
        match result {
            Ok(detail) => resolved[slot] = Some(detail),
            Err(err) => {
                tracing::warn!(slot, error = %err, "detail request failed, aborting batch");
                join_set.abort_all();
                return Err(err);
            }
        }
    }

    Ok(resolved.into_iter().flatten().collect())
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    tracing::debug!(url, "GET");
    let response = http_client().get(url).send().await?;
    let response = response.error_for_status()?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}
