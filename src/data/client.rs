//! PokéAPI client
//!
//! This module provides functionality to fetch list pages, per-item type
//! information, the category list, and full detail records from PokéAPI, and
//! parse them into our data structures.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use super::{PokemonDetail, PokemonRef, Stat};

/// Base URL for PokéAPI
pub const POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Errors that can occur when fetching from the API
///
/// Every variant counts as a fetch failure; callers do not distinguish them.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Remote catalog the pager and detail screen read from
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetches one listing page (`/pokemon?limit=L&offset=O`)
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<PokemonRef>, ApiError>;

    /// Fetches the type names of the item behind `url`
    async fn fetch_types_of(&self, url: &str) -> Result<Vec<String>, ApiError>;

    /// Fetches every category name (`/type`)
    async fn fetch_type_names(&self) -> Result<Vec<String>, ApiError>;

    /// Fetches the full record for `name` (`/pokemon/<name>`)
    async fn fetch_detail(&self, name: &str) -> Result<PokemonDetail, ApiError>;
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    results: Vec<PokemonRef>,
}

#[derive(Debug, Deserialize)]
struct TypeListResponse {
    results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Deserialize)]
struct TypesOnlyResponse {
    types: Vec<TypeSlot>,
}

#[derive(Debug, Deserialize)]
struct AbilitySlot {
    ability: NamedResource,
}

#[derive(Debug, Deserialize)]
struct StatSlot {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Debug, Default, Deserialize)]
struct Sprites {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    name: String,
    height: u32,
    weight: u32,
    #[serde(default)]
    abilities: Vec<AbilitySlot>,
    #[serde(default)]
    stats: Vec<StatSlot>,
    #[serde(default)]
    sprites: Sprites,
    #[serde(default)]
    types: Vec<TypeSlot>,
}

impl From<DetailResponse> for PokemonDetail {
    fn from(raw: DetailResponse) -> Self {
        Self {
            name: raw.name,
            height: raw.height,
            weight: raw.weight,
            abilities: raw.abilities.into_iter().map(|a| a.ability.name).collect(),
            stats: raw
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    base_stat: s.base_stat,
                })
                .collect(),
            sprite_url: raw.sprites.front_default,
            types: type_names(raw.types),
        }
    }
}

fn type_names(slots: Vec<TypeSlot>) -> Vec<String> {
    slots.into_iter().map(|slot| slot.kind.name).collect()
}

/// Client for fetching data from PokéAPI
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    /// Create a new client with a custom HTTP client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn page_url(&self, limit: usize, offset: usize) -> String {
        format!("{}/pokemon?limit={}&offset={}", self.base_url, limit, offset)
    }

    /// GETs `url` and parses the body, rejecting non-success statuses
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl Catalog for PokeApiClient {
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<PokemonRef>, ApiError> {
        let page: PageResponse = self.get_json(&self.page_url(limit, offset)).await?;
        Ok(page.results)
    }

    async fn fetch_types_of(&self, url: &str) -> Result<Vec<String>, ApiError> {
        let detail: TypesOnlyResponse = self.get_json(url).await?;
        Ok(type_names(detail.types))
    }

    async fn fetch_type_names(&self) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/type", self.base_url);
        let list: TypeListResponse = self.get_json(&url).await?;
        Ok(list.results.into_iter().map(|t| t.name).collect())
    }

    async fn fetch_detail(&self, name: &str) -> Result<PokemonDetail, ApiError> {
        let url = format!("{}/pokemon/{}", self.base_url, name.to_lowercase());
        let detail: DetailResponse = self.get_json(&url).await?;
        Ok(detail.into())
    }
}
