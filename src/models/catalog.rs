//! Static catalog of common products.
//!
//! Backs the similar-products section on the detail page and the
//! suggestion dropdown on the submission form. Loaded once at startup;
//! never mutated afterwards.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::normalize_text;

/// Category id used when a product is not in the catalog.
pub const UNKNOWN_CATEGORY: &str = "outro";

/// Root catalog structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCatalog {
    /// Catalogued products, in display order
    pub produtos: Vec<CatalogProduct>,
}

/// One catalogued product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogProduct {
    /// URL-safe identifier (e.g., "arroz-5kg")
    pub id: String,

    /// Display name (e.g., "Arroz 5kg")
    pub nome: String,

    /// Catalog category id (e.g., "alimento")
    pub categoria: String,

    /// Sales unit (e.g., "litro", "pacote")
    pub unidade: String,
}

impl ProductCatalog {
    /// Load a catalog from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load a catalog or return the built-in one if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Catalog load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate that every product has an id and ids are unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for produto in &self.produtos {
            if produto.id.trim().is_empty() {
                return Err(crate::error::AppError::validation(
                    "Catalog product with empty id",
                ));
            }
            if !seen.insert(produto.id.as_str()) {
                return Err(crate::error::AppError::validation(format!(
                    "Duplicate catalog product id: {}",
                    produto.id
                )));
            }
        }
        Ok(())
    }

    /// Look up a product by its id.
    pub fn product_by_id(&self, id: &str) -> Option<&CatalogProduct> {
        self.produtos.iter().find(|p| p.id == id)
    }

    /// Category of a product id, or [`UNKNOWN_CATEGORY`] if not catalogued.
    pub fn category_of(&self, id: &str) -> &str {
        self.product_by_id(id)
            .map(|p| p.categoria.as_str())
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Products in the same category, excluding the product itself.
    ///
    /// Returns up to `limit` entries in catalog order; empty when the id
    /// is unknown.
    pub fn similar_products(&self, id: &str, limit: usize) -> Vec<&CatalogProduct> {
        let Some(produto) = self.product_by_id(id) else {
            return Vec::new();
        };
        self.produtos
            .iter()
            .filter(|p| p.categoria == produto.categoria && p.id != id)
            .take(limit)
            .collect()
    }

    /// Filter products for the suggestion dropdown.
    ///
    /// Both filters are optional: `categoria` restricts to one catalog
    /// category, `filtro` is an accent-insensitive substring match on
    /// the display name. The result is capped at `limit`.
    pub fn search(&self, filtro: &str, categoria: Option<&str>, limit: usize) -> Vec<&CatalogProduct> {
        let needle = normalize_text(filtro);
        self.produtos
            .iter()
            .filter(|p| categoria.is_none_or(|c| p.categoria == c))
            .filter(|p| needle.is_empty() || normalize_text(&p.nome).contains(&needle))
            .take(limit)
            .collect()
    }

    /// Distinct category ids, in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.produtos
            .iter()
            .map(|p| p.categoria.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        let produto = |id: &str, nome: &str, categoria: &str, unidade: &str| CatalogProduct {
            id: id.to_string(),
            nome: nome.to_string(),
            categoria: categoria.to_string(),
            unidade: unidade.to_string(),
        };

        Self {
            produtos: vec![
                produto("gasolina-comum", "Gasolina Comum", "combustivel", "litro"),
                produto(
                    "gasolina-aditivada",
                    "Gasolina Aditivada",
                    "combustivel",
                    "litro",
                ),
                produto("etanol", "Etanol", "combustivel", "litro"),
                produto("diesel-s10", "Diesel S10", "combustivel", "litro"),
                produto(
                    "gas-de-cozinha-13kg",
                    "Gás de Cozinha 13kg",
                    "gas",
                    "botijão",
                ),
                produto("arroz-5kg", "Arroz 5kg", "alimento", "pacote"),
                produto("feijao-1kg", "Feijão 1kg", "alimento", "pacote"),
                produto("acucar-5kg", "Açúcar 5kg", "alimento", "pacote"),
                produto("cafe-500g", "Café 500g", "alimento", "pacote"),
                produto("oleo-de-soja-900ml", "Óleo de Soja 900ml", "alimento", "garrafa"),
                produto("leite-1l", "Leite 1L", "alimento", "caixa"),
            ],
        }
    }
}
