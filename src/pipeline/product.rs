// src/pipeline/product.rs

//! Read model for the product detail page.

use crate::error::Result;
use crate::models::{CatalogProduct, Config, PriceRecord, ProductCatalog};
use crate::store::PriceStore;
use crate::utils::{capitalize_words, slug_to_name};

/// Price range over the fetched records, for the page's aggregate
/// summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSummary {
    pub menor: f64,
    pub maior: f64,
    pub total: usize,
}

/// Everything the product detail page needs.
#[derive(Debug, Clone)]
pub struct ProductPage {
    /// Display name: catalog name when catalogued, otherwise the slug
    /// capitalized back into words
    pub nome: String,

    /// Matching records, newest first
    pub precos: Vec<PriceRecord>,

    /// Catalog entry, when the slug is a catalogued product
    pub info: Option<CatalogProduct>,

    /// Similar catalogued products (same category)
    pub similares: Vec<CatalogProduct>,

    /// Price range summary; `None` when there are no records
    pub resumo: Option<PriceSummary>,
}

/// Assemble the product detail page read model.
///
/// The slug comes straight from the URL: dashes turn back into spaces
/// and matching is a case-insensitive substring search, so
/// "gasolina-comum" finds "Gasolina Comum Aditivada" too.
pub async fn load_product(
    store: &dyn PriceStore,
    catalog: &ProductCatalog,
    config: &Config,
    slug: &str,
) -> Result<ProductPage> {
    let nome_busca = slug_to_name(slug);
    let precos = store
        .list_by_product(&nome_busca, config.site.product_limit)
        .await?;

    let info = catalog.product_by_id(slug).cloned();
    let similares = catalog
        .similar_products(slug, config.site.similar_limit)
        .into_iter()
        .cloned()
        .collect();

    let nome = info
        .as_ref()
        .map(|p| p.nome.clone())
        .unwrap_or_else(|| capitalize_words(&nome_busca));

    let resumo = summarize(&precos);

    Ok(ProductPage {
        nome,
        precos,
        info,
        similares,
        resumo,
    })
}

/// Compute the price range of a record set.
pub fn summarize(precos: &[PriceRecord]) -> Option<PriceSummary> {
    let first = precos.first()?;
    let mut menor = first.preco;
    let mut maior = first.preco;

    for preco in precos {
        menor = menor.min(preco.preco);
        maior = maior.max(preco.preco);
    }

    Some(PriceSummary {
        menor,
        maior,
        total: precos.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_load_product_for_catalogued_slug() {
        let store = MemoryStore::with_sample_data();
        let catalog = ProductCatalog::default();
        let config = Config::default();

        let page = load_product(&store, &catalog, &config, "arroz-5kg")
            .await
            .unwrap();

        assert_eq!(page.nome, "Arroz 5kg");
        assert_eq!(page.precos.len(), 2);
        assert!(page.info.is_some());
        assert!(!page.similares.is_empty());
        assert!(page.similares.iter().all(|p| p.categoria == "alimento"));

        let resumo = page.resumo.unwrap();
        assert_eq!(resumo.menor, 19.90);
        assert_eq!(resumo.maior, 22.0);
        assert_eq!(resumo.total, 2);
    }

    #[tokio::test]
    async fn test_load_product_for_unknown_slug() {
        let store = MemoryStore::with_sample_data();
        let catalog = ProductCatalog::default();
        let config = Config::default();

        let page = load_product(&store, &catalog, &config, "picanha-kg")
            .await
            .unwrap();

        assert_eq!(page.nome, "Picanha Kg");
        assert!(page.precos.is_empty());
        assert!(page.info.is_none());
        assert!(page.similares.is_empty());
        assert!(page.resumo.is_none());
    }

    #[test]
    fn test_summarize_empty_is_none() {
        assert!(summarize(&[]).is_none());
    }
}
