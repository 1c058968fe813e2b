// src/services/filter.rs

//! Listing page filter and sort pipeline.
//!
//! All active filters are AND-combined. The category filter re-runs the
//! classifier against each record's product name; there is no stored
//! category column to consult.

use std::str::FromStr;

use crate::error::AppError;
use crate::models::PriceRecord;

use super::classify::CategoryClassifier;

/// User-selected filters. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceFilter {
    /// Exact city match
    pub cidade: Option<String>,

    /// Exact neighborhood match
    pub bairro: Option<String>,

    /// Category label, matched through the classifier
    pub categoria: Option<String>,
}

impl PriceFilter {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.cidade.is_none() && self.bairro.is_none() && self.categoria.is_none()
    }
}

/// Sort order for the listing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first (the default)
    #[default]
    Newest,
    /// Oldest first
    Oldest,
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
}

impl FromStr for SortOrder {
    type Err = AppError;

    /// Parse the order names the site uses in its sort selector.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recentes" => Ok(SortOrder::Newest),
            "antigos" => Ok(SortOrder::Oldest),
            "menor-preco" => Ok(SortOrder::PriceAsc),
            "maior-preco" => Ok(SortOrder::PriceDesc),
            other => Err(AppError::validation(format!(
                "Unknown sort order: {other}"
            ))),
        }
    }
}

/// Apply filters and sort the result for display.
///
/// The output is always a subset of `records`; sorts are stable, so
/// ties keep the store's original order. An empty result is valid and
/// means "no results", not an error.
pub fn filter_and_sort(
    records: &[PriceRecord],
    filter: &PriceFilter,
    classifier: &CategoryClassifier,
    ordem: SortOrder,
) -> Vec<PriceRecord> {
    let mut result: Vec<PriceRecord> = records
        .iter()
        .filter(|record| matches_all(record, filter, classifier))
        .cloned()
        .collect();

    match ordem {
        SortOrder::Newest => result.sort_by(|a, b| b.data.cmp(&a.data)),
        SortOrder::Oldest => result.sort_by(|a, b| a.data.cmp(&b.data)),
        SortOrder::PriceAsc => result.sort_by(|a, b| a.preco.total_cmp(&b.preco)),
        SortOrder::PriceDesc => result.sort_by(|a, b| b.preco.total_cmp(&a.preco)),
    }

    result
}

/// Check if a single record passes every active filter.
fn matches_all(
    record: &PriceRecord,
    filter: &PriceFilter,
    classifier: &CategoryClassifier,
) -> bool {
    if let Some(ref cidade) = filter.cidade {
        if record.cidade != *cidade {
            return false;
        }
    }

    if let Some(ref bairro) = filter.bairro {
        if record.bairro != *bairro {
            return false;
        }
    }

    if let Some(ref categoria) = filter.categoria {
        if classifier.classify(&record.produto) != categoria {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Config;
    use chrono::{DateTime, Utc};

    fn classifier() -> CategoryClassifier {
        CategoryClassifier::from_config(&Config::default())
    }

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn record(id: i64, produto: &str, preco: f64, bairro: &str, data: &str) -> PriceRecord {
        PriceRecord {
            id,
            produto: produto.to_string(),
            preco,
            loja: "Supermercado BH".to_string(),
            bairro: bairro.to_string(),
            cidade: "Montes Claros".to_string(),
            estado: "MG".to_string(),
            data: ts(data),
        }
    }

    fn sample() -> Vec<PriceRecord> {
        vec![
            record(1, "Gasolina Comum", 5.89, "Centro", "2025-03-01T10:00:00Z"),
            record(2, "Arroz 5kg", 22.0, "Major Prates", "2025-03-02T10:00:00Z"),
            record(3, "Arroz 5kg", 19.90, "Centro", "2025-03-03T10:00:00Z"),
            record(4, "Detergente", 2.49, "Ibituruna", "2025-03-04T10:00:00Z"),
        ]
    }

    #[test]
    fn test_no_filters_returns_everything_newest_first() {
        let records = sample();
        let result = filter_and_sort(&records, &PriceFilter::default(), &classifier(), SortOrder::Newest);
        let ids: Vec<i64> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_neighborhood_filter() {
        let records = sample();
        let filter = PriceFilter {
            bairro: Some("Centro".to_string()),
            ..PriceFilter::default()
        };
        let result = filter_and_sort(&records, &filter, &classifier(), SortOrder::Newest);
        assert!(result.iter().all(|r| r.bairro == "Centro"));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_category_filter_reruns_classifier() {
        let records = sample();
        let filter = PriceFilter {
            categoria: Some("Alimentos".to_string()),
            ..PriceFilter::default()
        };
        let result = filter_and_sort(&records, &filter, &classifier(), SortOrder::Newest);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.produto == "Arroz 5kg"));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let records = sample();
        let filter = PriceFilter {
            bairro: Some("Centro".to_string()),
            categoria: Some("Alimentos".to_string()),
            ..PriceFilter::default()
        };
        let result = filter_and_sort(&records, &filter, &classifier(), SortOrder::Newest);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 3);
    }

    #[test]
    fn test_output_is_subset_of_input() {
        let records = sample();
        let filter = PriceFilter {
            cidade: Some("Montes Claros".to_string()),
            ..PriceFilter::default()
        };
        let result = filter_and_sort(&records, &filter, &classifier(), SortOrder::PriceDesc);
        for r in &result {
            assert!(records.contains(r));
        }
    }

    #[test]
    fn test_unmatched_filter_yields_empty_result() {
        let records = sample();
        let filter = PriceFilter {
            bairro: Some("Santo Expedito".to_string()),
            ..PriceFilter::default()
        };
        let result = filter_and_sort(&records, &filter, &classifier(), SortOrder::Newest);
        assert!(result.is_empty());
    }

    #[test]
    fn test_price_ascending_is_monotonic() {
        let records = sample();
        let result = filter_and_sort(&records, &PriceFilter::default(), &classifier(), SortOrder::PriceAsc);
        for pair in result.windows(2) {
            assert!(pair[0].preco <= pair[1].preco);
        }
    }

    #[test]
    fn test_price_ties_keep_input_order() {
        let records = vec![
            record(1, "Leite 1L", 4.99, "Centro", "2025-03-01T10:00:00Z"),
            record(2, "Etanol", 4.99, "Centro", "2025-03-02T10:00:00Z"),
        ];
        let result = filter_and_sort(&records, &PriceFilter::default(), &classifier(), SortOrder::PriceAsc);
        let ids: Vec<i64> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("recentes".parse::<SortOrder>().unwrap(), SortOrder::Newest);
        assert_eq!("antigos".parse::<SortOrder>().unwrap(), SortOrder::Oldest);
        assert_eq!(
            "menor-preco".parse::<SortOrder>().unwrap(),
            SortOrder::PriceAsc
        );
        assert_eq!(
            "maior-preco".parse::<SortOrder>().unwrap(),
            SortOrder::PriceDesc
        );
        assert!("aleatorio".parse::<SortOrder>().is_err());
    }
}
