// src/services/ranking.rs

//! Best-offer aggregation for the featured-products carousel.

use std::collections::HashMap;

use crate::models::PriceRecord;

/// Pick the cheapest record per distinct product, ranked by price.
///
/// Groups records by product name (case-insensitive), keeps the lowest
/// priced record of each group, sorts the group minima ascending by
/// price and truncates to `max`. Ties keep the first-seen record, both
/// within a group and in the final ordering, so repeated runs over the
/// same input produce identical output.
pub fn best_offers(records: &[PriceRecord], max: usize) -> Vec<PriceRecord> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut cheapest: Vec<PriceRecord> = Vec::new();

    for record in records {
        let key = record.produto.to_lowercase();
        match index.get(&key) {
            Some(&slot) => {
                if record.preco < cheapest[slot].preco {
                    cheapest[slot] = record.clone();
                }
            }
            None => {
                index.insert(key, cheapest.len());
                cheapest.push(record.clone());
            }
        }
    }

    cheapest.sort_by(|a, b| a.preco.total_cmp(&b.preco));
    cheapest.truncate(max);
    cheapest
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: i64, produto: &str, preco: f64) -> PriceRecord {
        PriceRecord {
            id,
            produto: produto.to_string(),
            preco,
            loja: "Mercado Central".to_string(),
            bairro: "Centro".to_string(),
            cidade: "Montes Claros".to_string(),
            estado: "MG".to_string(),
            data: Utc::now(),
        }
    }

    #[test]
    fn test_cheapest_per_product_ranked_ascending() {
        let records = vec![
            record(1, "Arroz 5kg", 22.0),
            record(2, "Arroz 5kg", 19.90),
            record(3, "Feijão 1kg", 8.50),
        ];

        let offers = best_offers(&records, 10);
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].produto, "Feijão 1kg");
        assert_eq!(offers[0].preco, 8.50);
        assert_eq!(offers[1].produto, "Arroz 5kg");
        assert_eq!(offers[1].preco, 19.90);
    }

    #[test]
    fn test_grouping_is_case_insensitive() {
        let records = vec![
            record(1, "ARROZ 5KG", 22.0),
            record(2, "arroz 5kg", 19.90),
        ];

        let offers = best_offers(&records, 10);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].id, 2);
    }

    #[test]
    fn test_equal_prices_keep_first_seen() {
        let records = vec![
            record(1, "Leite 1L", 4.99),
            record(2, "Leite 1L", 4.99),
            record(3, "Etanol", 4.99),
        ];

        let offers = best_offers(&records, 10);
        // Within the group: record 1 wins. Across groups: Leite stays
        // ahead of Etanol because it was seen first.
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].id, 1);
        assert_eq!(offers[1].produto, "Etanol");
    }

    #[test]
    fn test_truncates_to_max() {
        let records: Vec<_> = (0..20)
            .map(|i| record(i, &format!("Produto {}", i), i as f64))
            .collect();

        let offers = best_offers(&records, 10);
        assert_eq!(offers.len(), 10);
    }

    #[test]
    fn test_prices_are_non_decreasing() {
        let records = vec![
            record(1, "A", 9.0),
            record(2, "B", 3.0),
            record(3, "C", 7.0),
            record(4, "B", 2.5),
            record(5, "D", 7.0),
        ];

        let offers = best_offers(&records, 10);
        for pair in offers.windows(2) {
            assert!(pair[0].preco <= pair[1].preco);
        }
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(best_offers(&[], 10).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            record(1, "Arroz 5kg", 22.0),
            record(2, "Feijão 1kg", 8.50),
            record(3, "Arroz 5kg", 19.90),
        ];

        assert_eq!(best_offers(&records, 10), best_offers(&records, 10));
    }
}
