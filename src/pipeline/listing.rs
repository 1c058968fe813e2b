// src/pipeline/listing.rs

//! Read model for the listing (home) page.

use futures::join;
use log::warn;

use crate::error::Result;
use crate::models::{Config, PriceRecord};
use crate::store::PriceStore;
use crate::utils::normalize_text;

/// Everything the listing page needs: recent prices plus the filter
/// option lists.
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// Recent records, newest first
    pub precos: Vec<PriceRecord>,

    /// Neighborhood filter options
    pub bairros: Vec<String>,

    /// City filter options; always contains the home city
    pub cidades: Vec<String>,
}

/// Assemble the listing page read model.
///
/// The recent-prices fetch is the page's primary content and its errors
/// propagate. The two option lists are auxiliary: a failure there is
/// logged and degrades to the configured fallbacks, keeping the page
/// usable.
pub async fn load_listing(store: &dyn PriceStore, config: &Config) -> Result<ListingPage> {
    let (precos, bairros, cidades) = join!(
        store.list_recent(config.site.recent_limit),
        store.distinct_bairros(),
        store.distinct_cidades(),
    );

    let precos = precos?;

    let bairros = match bairros {
        Ok(list) => merge_bairros(list, &config.known_bairros),
        Err(e) => {
            warn!("Neighborhood listing failed: {}. Using the known list.", e);
            merge_bairros(Vec::new(), &config.known_bairros)
        }
    };

    let cidades = match cidades {
        Ok(list) => ensure_home_city(list, &config.site.cidade),
        Err(e) => {
            warn!("City listing failed: {}. Using the home city only.", e);
            vec![config.site.cidade.clone()]
        }
    };

    Ok(ListingPage {
        precos,
        bairros,
        cidades,
    })
}

/// Merge store neighborhoods with the configured well-known list.
///
/// Duplicates are dropped and the result is sorted accent- and
/// case-insensitively, so "Água Fria" files next to "Agua Fria".
pub fn merge_bairros(from_store: Vec<String>, known: &[String]) -> Vec<String> {
    let mut merged = from_store;
    merged.extend(known.iter().cloned());

    merged.sort_by_key(|b| normalize_text(b));
    merged.dedup();
    merged
}

/// Guarantee the home city is present, first when it was missing.
fn ensure_home_city(mut cidades: Vec<String>, home: &str) -> Vec<String> {
    if !cidades.iter().any(|c| c == home) {
        cidades.insert(0, home.to_string());
    }
    cidades
}
