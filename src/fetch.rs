//! Detail fetching in bounded concurrent batches
//!
//! A page listing only carries names and URLs. Each entry's types come from a
//! separate detail request; those requests run `max_concurrent` at a time,
//! one chunk after another.

use futures::future::join_all;
use tracing::debug;

use crate::data::{ApiError, Catalog, Pokemon, PokemonRef};

/// Resolves the types of every entry in `refs`
///
/// Entries are processed in consecutive chunks of `max_concurrent`; a chunk
/// starts only after every request of the previous one has settled. A failed
/// request keeps its entry with an empty type list. Output order matches
/// input order. A bound of 0 is treated as 1.
pub async fn fetch_details<C>(catalog: &C, refs: Vec<PokemonRef>, max_concurrent: usize) -> Vec<Pokemon>
where
    C: Catalog + ?Sized,
{
    let chunk_size = max_concurrent.max(1);
    let mut resolved = Vec::with_capacity(refs.len());

    for chunk in refs.chunks(chunk_size) {
        let fetches = chunk.iter().map(|reference| resolve(catalog, reference));
        // join_all yields results in the order of its inputs
        resolved.extend(join_all(fetches).await);
    }

    resolved
}

async fn resolve<C>(catalog: &C, reference: &PokemonRef) -> Pokemon
where
    C: Catalog + ?Sized,
{
    match catalog.fetch_types_of(&reference.url).await {
        Ok(types) => Pokemon::with_types(reference.clone(), types),
        Err(e) => {
            debug!(name = %reference.name, error = %e, "detail fetch failed, keeping item without types");
            Pokemon::with_types(reference.clone(), Vec::new())
        }
    }
}

/// Fetches one listing page and resolves the types of its entries
pub async fn fetch_page_with_details<C>(
    catalog: &C,
    limit: usize,
    offset: usize,
    max_concurrent: usize,
) -> Result<Vec<Pokemon>, ApiError>
where
    C: Catalog + ?Sized,
{
    let refs = catalog.fetch_page(limit, offset).await?;
    Ok(fetch_details(catalog, refs, max_concurrent).await)
}
