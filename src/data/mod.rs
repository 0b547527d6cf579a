//! Core data models for the Pokédex
//!
//! This module contains the types used throughout the application for
//! representing list entries, resolved list items, and full detail records.

pub mod client;

pub use client::{ApiError, Catalog, PokeApiClient};

use serde::{Deserialize, Serialize};

/// Lightweight listing entry as returned by a page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonRef {
    /// Unique, stable identifier
    pub name: String,
    /// URL of the detail record
    pub url: String,
}

/// A list item, optionally resolved with its types
///
/// `types` is `None` until the detail fetch for the item has settled. After
/// that it is always `Some`, and empty when the detail fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
}

impl Pokemon {
    /// Creates an item with resolved types
    pub fn with_types(reference: PokemonRef, types: Vec<String>) -> Self {
        Self {
            name: reference.name,
            url: reference.url,
            types: Some(types),
        }
    }

    /// Whether the resolved types contain `type_name`
    ///
    /// Unresolved items never match.
    pub fn has_type(&self, type_name: &str) -> bool {
        self.types
            .as_ref()
            .is_some_and(|types| types.iter().any(|t| t == type_name))
    }
}

/// A single base stat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub base_stat: u32,
}

/// Full record shown on the detail screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonDetail {
    pub name: String,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    pub abilities: Vec<String>,
    pub stats: Vec<Stat>,
    /// Front sprite image URL, if the API has one
    pub sprite_url: Option<String>,
    pub types: Vec<String>,
}

impl PokemonDetail {
    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unresolved(name: &str) -> Pokemon {
        let reference = reference(name);
        Pokemon {
            name: reference.name,
            url: reference.url,
            types: None,
        }
    }

    fn reference(name: &str) -> PokemonRef {
        PokemonRef {
            name: name.to_string(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{}/", name),
        }
    }

    #[test]
    fn test_unresolved_item_has_no_types() {
        let pokemon = unresolved("pikachu");
        assert_eq!(pokemon.name, "pikachu");
        assert!(pokemon.types.is_none());
        assert!(!pokemon.has_type("electric"));
    }

    #[test]
    fn test_has_type_checks_resolved_types() {
        let pokemon = Pokemon::with_types(
            reference("bulbasaur"),
            vec!["grass".to_string(), "poison".to_string()],
        );
        assert!(pokemon.has_type("poison"));
        assert!(!pokemon.has_type("fire"));
    }

    #[test]
    fn test_unresolved_types_are_omitted_from_json() {
        let json = serde_json::to_string(&unresolved("mew")).unwrap();
        assert!(!json.contains("types"));

        let back: Pokemon = serde_json::from_str(&json).unwrap();
        assert!(back.types.is_none());
    }

    #[test]
    fn test_detail_unit_conversion() {
        let detail = PokemonDetail {
            name: "charizard".to_string(),
            height: 17,
            weight: 905,
            abilities: vec![],
            stats: vec![],
            sprite_url: None,
            types: vec![],
        };
        assert!((detail.height_m() - 1.7).abs() < 0.0001);
        assert!((detail.weight_kg() - 90.5).abs() < 0.0001);
    }
}
