// src/store/rest.rs

//! REST backend for the hosted price table.
//!
//! Speaks the hosted table's REST dialect: filters are query parameters
//! (`eq.`, `ilike.`, `not.is.null`), ordering and limits are query
//! parameters too, and inserts return the stored row when asked via the
//! `Prefer` header.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{NewPrice, PriceRecord, StoreConfig};

use super::PriceStore;

/// Client for the hosted price table's REST interface.
pub struct RestStore {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl RestStore {
    /// Create a new store client from configuration.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(AppError::config(
                "store.url is not configured (set it in config.toml or PRECOS_STORE_URL)",
            ));
        }

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base = Url::parse(&config.url)?;
        let endpoint = base.join(&format!("rest/v1/{}", config.table))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    /// The resolved table endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Build a select URL with ordering, limit and extra filters.
    fn select_url(&self, filters: &[(&str, &str)], limit: usize) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("select", "*")
                .append_pair("order", "data.desc")
                .append_pair("limit", &limit.to_string());
            for (key, value) in filters {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    async fn fetch_records(&self, operation: &str, url: Url) -> Result<Vec<PriceRecord>> {
        let response = self
            .authed(self.client.get(url))
            .send()
            .await
            .map_err(|e| AppError::store(operation, e))?
            .error_for_status()
            .map_err(|e| AppError::store(operation, e))?;

        response
            .json()
            .await
            .map_err(|e| AppError::store(operation, e))
    }

    /// Fetch the distinct non-null values of one column.
    ///
    /// The REST dialect has no DISTINCT, so this selects the column
    /// sorted ascending with nulls dropped server-side and
    /// de-duplicates client-side, exactly as the site has always done.
    async fn distinct_column(&self, operation: &str, column: &str) -> Result<Vec<String>> {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("select", column)
                .append_pair("order", &format!("{column}.asc"))
                .append_pair(column, "not.is.null");
        }

        let response = self
            .authed(self.client.get(url))
            .send()
            .await
            .map_err(|e| AppError::store(operation, e))?
            .error_for_status()
            .map_err(|e| AppError::store(operation, e))?;

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| AppError::store(operation, e))?;

        let mut values: Vec<String> = rows
            .iter()
            .filter_map(|row| row.get(column).and_then(|v| v.as_str()))
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .collect();
        values.dedup();
        Ok(values)
    }
}

#[async_trait]
impl PriceStore for RestStore {
    async fn list_recent(&self, limit: usize) -> Result<Vec<PriceRecord>> {
        let url = self.select_url(&[], limit);
        self.fetch_records("list_recent", url).await
    }

    async fn list_by_product(&self, produto: &str, limit: usize) -> Result<Vec<PriceRecord>> {
        let pattern = format!("ilike.*{produto}*");
        let url = self.select_url(&[("produto", pattern.as_str())], limit);
        self.fetch_records("list_by_product", url).await
    }

    async fn list_by_bairro(&self, bairro: &str, limit: usize) -> Result<Vec<PriceRecord>> {
        let value = format!("eq.{bairro}");
        let url = self.select_url(&[("bairro", value.as_str())], limit);
        self.fetch_records("list_by_bairro", url).await
    }

    async fn list_by_cidade(&self, cidade: &str, limit: usize) -> Result<Vec<PriceRecord>> {
        let value = format!("eq.{cidade}");
        let url = self.select_url(&[("cidade", value.as_str())], limit);
        self.fetch_records("list_by_cidade", url).await
    }

    async fn list_by_loja(&self, loja: &str, limit: usize) -> Result<Vec<PriceRecord>> {
        let value = format!("eq.{loja}");
        let url = self.select_url(&[("loja", value.as_str())], limit);
        self.fetch_records("list_by_loja", url).await
    }

    async fn insert(&self, novo: &NewPrice) -> Result<PriceRecord> {
        let mut payload = novo.clone();
        if payload.data.is_none() {
            payload.data = Some(Utc::now());
        }

        let response = self
            .authed(self.client.post(self.endpoint.clone()))
            .header("Prefer", "return=representation")
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::store("insert", e))?
            .error_for_status()
            .map_err(|e| AppError::store("insert", e))?;

        let mut inserted: Vec<PriceRecord> = response
            .json()
            .await
            .map_err(|e| AppError::store("insert", e))?;

        inserted
            .pop()
            .ok_or_else(|| AppError::store("insert", "store returned no inserted row"))
    }

    async fn distinct_bairros(&self) -> Result<Vec<String>> {
        self.distinct_column("distinct_bairros", "bairro").await
    }

    async fn distinct_cidades(&self) -> Result<Vec<String>> {
        self.distinct_column("distinct_cidades", "cidade").await
    }

    async fn distinct_lojas(&self) -> Result<Vec<String>> {
        self.distinct_column("distinct_lojas", "loja").await
    }
}
