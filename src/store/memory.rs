// src/store/memory.rs

//! In-memory store backend.
//!
//! Backs the unit tests and the CLI's offline demo mode with the same
//! ordering and filtering semantics as the hosted table.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::error::Result;
use crate::models::{NewPrice, PriceRecord};

use super::PriceStore;

#[derive(Debug, Default)]
struct Inner {
    records: Vec<PriceRecord>,
    last_id: i64,
}

/// Price store holding records in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with the given records.
    pub fn with_records(records: Vec<PriceRecord>) -> Self {
        let last_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            inner: Mutex::new(Inner {
                records,
                last_id,
            }),
        }
    }

    /// Create a store with a handful of demo records.
    pub fn with_sample_data() -> Self {
        let now = Utc::now();
        let record = |id: i64, produto: &str, preco: f64, loja: &str, bairro: &str, hours: i64| {
            PriceRecord {
                id,
                produto: produto.to_string(),
                preco,
                loja: loja.to_string(),
                bairro: bairro.to_string(),
                cidade: "Montes Claros".to_string(),
                estado: "MG".to_string(),
                data: now - Duration::hours(hours),
            }
        };

        Self::with_records(vec![
            record(1, "Gasolina Comum", 5.89, "Posto Trevão", "Centro", 2),
            record(2, "Gasolina Comum", 5.79, "Posto Ibituruna", "Ibituruna", 5),
            record(3, "Etanol", 3.99, "Posto Trevão", "Centro", 3),
            record(4, "Arroz 5kg", 22.0, "Supermercado BH", "Major Prates", 8),
            record(5, "Arroz 5kg", 19.90, "Mart Minas", "Centro", 26),
            record(6, "Feijão 1kg", 8.50, "Supermercado BH", "Major Prates", 30),
            record(7, "Gás de Cozinha 13kg", 105.0, "Supergasbras", "Todos os Santos", 50),
            record(8, "Leite 1L", 4.79, "Mart Minas", "Centro", 4),
        ])
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn newest_first(mut records: Vec<PriceRecord>, limit: usize) -> Vec<PriceRecord> {
        records.sort_by(|a, b| b.data.cmp(&a.data));
        records.truncate(limit);
        records
    }

    fn distinct<F>(&self, field: F) -> Vec<String>
    where
        F: Fn(&PriceRecord) -> &str,
    {
        let inner = self.lock();
        let mut values: Vec<String> = inner
            .records
            .iter()
            .map(|r| field(r))
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .collect();
        values.sort();
        values.dedup();
        values
    }
}

#[async_trait]
impl PriceStore for MemoryStore {
    async fn list_recent(&self, limit: usize) -> Result<Vec<PriceRecord>> {
        let records = self.lock().records.clone();
        Ok(Self::newest_first(records, limit))
    }

    async fn list_by_product(&self, produto: &str, limit: usize) -> Result<Vec<PriceRecord>> {
        let needle = produto.to_lowercase();
        let records = self
            .lock()
            .records
            .iter()
            .filter(|r| r.produto.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(Self::newest_first(records, limit))
    }

    async fn list_by_bairro(&self, bairro: &str, limit: usize) -> Result<Vec<PriceRecord>> {
        let records = self
            .lock()
            .records
            .iter()
            .filter(|r| r.bairro == bairro)
            .cloned()
            .collect();
        Ok(Self::newest_first(records, limit))
    }

    async fn list_by_cidade(&self, cidade: &str, limit: usize) -> Result<Vec<PriceRecord>> {
        let records = self
            .lock()
            .records
            .iter()
            .filter(|r| r.cidade == cidade)
            .cloned()
            .collect();
        Ok(Self::newest_first(records, limit))
    }

    async fn list_by_loja(&self, loja: &str, limit: usize) -> Result<Vec<PriceRecord>> {
        let records = self
            .lock()
            .records
            .iter()
            .filter(|r| r.loja == loja)
            .cloned()
            .collect();
        Ok(Self::newest_first(records, limit))
    }

    async fn insert(&self, novo: &NewPrice) -> Result<PriceRecord> {
        let mut inner = self.lock();
        inner.last_id += 1;
        let record = PriceRecord {
            id: inner.last_id,
            produto: novo.produto.clone(),
            preco: novo.preco,
            loja: novo.loja.clone(),
            bairro: novo.bairro.clone(),
            cidade: novo.cidade.clone(),
            estado: novo.estado.clone(),
            data: novo.data.unwrap_or_else(Utc::now),
        };
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn distinct_bairros(&self) -> Result<Vec<String>> {
        Ok(self.distinct(|r| &r.bairro))
    }

    async fn distinct_cidades(&self) -> Result<Vec<String>> {
        Ok(self.distinct(|r| &r.cidade))
    }

    async fn distinct_lojas(&self) -> Result<Vec<String>> {
        Ok(self.distinct(|r| &r.loja))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_recent_orders_newest_first() {
        let store = MemoryStore::with_sample_data();
        let records = store.list_recent(50).await.unwrap();
        for pair in records.windows(2) {
            assert!(pair[0].data >= pair[1].data);
        }
    }

    #[tokio::test]
    async fn test_list_recent_respects_limit() {
        let store = MemoryStore::with_sample_data();
        let records = store.list_recent(3).await.unwrap();
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_list_by_product_substring_case_insensitive() {
        let store = MemoryStore::with_sample_data();
        let records = store.list_by_product("arroz 5kg", 50).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.produto == "Arroz 5kg"));
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamp() {
        let store = MemoryStore::new();
        let novo = NewPrice {
            produto: "Café 500g".to_string(),
            preco: 18.90,
            loja: "Mart Minas".to_string(),
            bairro: "Centro".to_string(),
            cidade: "Montes Claros".to_string(),
            estado: "MG".to_string(),
            data: None,
        };

        let record = store.insert(&novo).await.unwrap();
        assert_eq!(record.id, 1);

        let listed = store.list_recent(10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].produto, "Café 500g");
    }

    #[tokio::test]
    async fn test_insert_increments_ids() {
        let store = MemoryStore::with_sample_data();
        let novo = NewPrice {
            produto: "Açúcar 5kg".to_string(),
            preco: 21.50,
            loja: "Supermercado BH".to_string(),
            bairro: "Major Prates".to_string(),
            cidade: "Montes Claros".to_string(),
            estado: "MG".to_string(),
            data: None,
        };

        let first = store.insert(&novo).await.unwrap();
        let second = store.insert(&novo).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_distinct_bairros_sorted_and_deduped() {
        let store = MemoryStore::with_sample_data();
        let bairros = store.distinct_bairros().await.unwrap();

        let mut sorted = bairros.clone();
        sorted.sort();
        assert_eq!(bairros, sorted);

        let mut deduped = bairros.clone();
        deduped.dedup();
        assert_eq!(bairros, deduped);
    }

    #[tokio::test]
    async fn test_distinct_skips_blank_values() {
        let store = MemoryStore::new();
        let novo = NewPrice {
            produto: "Etanol".to_string(),
            preco: 3.99,
            loja: "".to_string(),
            bairro: "".to_string(),
            cidade: "Montes Claros".to_string(),
            estado: "MG".to_string(),
            data: None,
        };
        store.insert(&novo).await.unwrap();

        assert!(store.distinct_lojas().await.unwrap().is_empty());
        assert!(store.distinct_bairros().await.unwrap().is_empty());
    }
}
