//! Price record data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};

use super::SiteConfig;

/// The hosted table allows SQL nulls in the optional text columns;
/// treat them as empty strings on the way in.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A price observation stored in the remote table.
///
/// Field names match the table columns, so records serialize straight
/// onto the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    /// Unique identifier, assigned by the store on insert
    pub id: i64,

    /// Free-text product name as submitted (trimmed, not normalized)
    pub produto: String,

    /// Price in BRL, always positive
    pub preco: f64,

    /// Store/establishment name
    #[serde(default, deserialize_with = "null_as_empty")]
    pub loja: String,

    /// Neighborhood
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bairro: String,

    /// City
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cidade: String,

    /// Region code (e.g., "MG")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub estado: String,

    /// Submission timestamp
    pub data: DateTime<Utc>,
}

/// Payload for inserting a new price record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPrice {
    pub produto: String,
    pub preco: f64,
    pub loja: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,

    /// Defaults to the insert time when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DateTime<Utc>>,
}

/// Sentinel select value that routes the free-text companion field.
const OTHER_STORE: &str = "outra";
const OTHER_BAIRRO: &str = "outro";
const OTHER_CITY: &str = "outra";

/// Raw form input for the add-price page.
///
/// Mirrors the submission form: store, neighborhood and city are select
/// fields whose "other" sentinel enables a free-text companion input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceDraft {
    pub produto: String,
    /// Raw price text; comma or dot decimal separator
    pub preco: String,
    pub loja: String,
    pub outra_loja: String,
    pub bairro: String,
    pub outro_bairro: String,
    pub cidade: String,
    pub outra_cidade: String,
}

impl PriceDraft {
    /// Validate the draft and build the insert payload.
    ///
    /// Product name and price are mandatory; the price must parse as a
    /// positive decimal. Everything else falls back to the site
    /// defaults.
    pub fn resolve(&self, site: &SiteConfig) -> Result<NewPrice> {
        if self.produto.trim().is_empty() || self.preco.trim().is_empty() {
            return Err(AppError::validation(
                "Por favor, preencha todos os campos obrigatórios.",
            ));
        }

        let preco = parse_price(&self.preco)?;

        let loja = if self.loja == OTHER_STORE {
            self.outra_loja.trim()
        } else {
            self.loja.trim()
        };
        let bairro = if self.bairro == OTHER_BAIRRO {
            self.outro_bairro.trim()
        } else {
            self.bairro.trim()
        };
        let cidade = if self.cidade == OTHER_CITY {
            self.outra_cidade.trim()
        } else {
            self.cidade.trim()
        };
        let cidade = if cidade.is_empty() {
            site.cidade.as_str()
        } else {
            cidade
        };

        Ok(NewPrice {
            produto: self.produto.trim().to_string(),
            preco,
            loja: loja.to_string(),
            bairro: bairro.to_string(),
            cidade: cidade.to_string(),
            estado: site.estado.clone(),
            data: None,
        })
    }

    /// Reset all fields, as after a successful submission.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when nothing has been entered yet.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse a user-entered price, accepting `,` or `.` as decimal separator.
fn parse_price(raw: &str) -> Result<f64> {
    let normalized = raw.trim().replace(',', ".");
    let value: f64 = normalized
        .parse()
        .map_err(|_| AppError::validation("O preço informado não é um número válido."))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::validation("O preço deve ser um valor positivo."));
    }
    Ok(value)
}
