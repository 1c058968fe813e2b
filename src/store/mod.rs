//! Price store abstractions.
//!
//! The source of truth is one hosted relational table (`precos`); this
//! module defines the access trait plus two backends:
//! - `RestStore`: the hosted table's REST interface (production)
//! - `MemoryStore`: in-process vector (tests and the offline demo)
//!
//! All reads are ordered by submission timestamp descending and capped
//! by a caller-supplied limit. Records are immutable once inserted;
//! there are no update or delete operations anywhere in this trait.

pub mod memory;
pub mod rest;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewPrice, PriceRecord};

// Re-export for convenience
pub use memory::MemoryStore;
pub use rest::RestStore;

/// Trait for price record storage backends.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Most recent records, newest first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<PriceRecord>>;

    /// Records whose product name contains `produto` (case-insensitive).
    async fn list_by_product(&self, produto: &str, limit: usize) -> Result<Vec<PriceRecord>>;

    /// Records for one neighborhood.
    async fn list_by_bairro(&self, bairro: &str, limit: usize) -> Result<Vec<PriceRecord>>;

    /// Records for one city.
    async fn list_by_cidade(&self, cidade: &str, limit: usize) -> Result<Vec<PriceRecord>>;

    /// Records for one store/establishment.
    async fn list_by_loja(&self, loja: &str, limit: usize) -> Result<Vec<PriceRecord>>;

    /// Insert one record; the store assigns the id and defaults the
    /// timestamp to "now" when the payload carries none.
    async fn insert(&self, novo: &NewPrice) -> Result<PriceRecord>;

    /// Distinct non-null neighborhoods, sorted ascending.
    async fn distinct_bairros(&self) -> Result<Vec<String>>;

    /// Distinct non-null cities, sorted ascending.
    async fn distinct_cidades(&self) -> Result<Vec<String>>;

    /// Distinct non-null stores, sorted ascending.
    async fn distinct_lojas(&self) -> Result<Vec<String>>;
}
