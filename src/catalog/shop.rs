//! Shop catalog view.
//!
//! Items are keyed by display name. When an exact lookup misses, callers
//! ask for similar items: a blend of lookalike names (by character
//! similarity) and the neighbors adjacent in price order, so "小心心"
//! suggests both 大心心 and items the player could afford instead.

use crate::catalog::fuzzy::similarity_ratio;
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Minimum [`similarity_ratio`] for a name to count as a lookalike.
const NAME_SIMILARITY_CUTOFF: f64 = 0.6;

/// One shop listing. Unknown quantity defaults to 0 (sold out).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopItem {
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read-only lookup view over a shop catalog document.
pub struct ShopCatalog {
    store: DocumentStore,
}

impl ShopCatalog {
    pub fn new(store: DocumentStore) -> Self {
        ShopCatalog { store }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    fn decode(value: &Value) -> Option<ShopItem> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Exact lookup by item name.
    pub fn item_info(&self, name: &str) -> Option<ShopItem> {
        Self::decode(self.store.root().get(name)?)
    }

    /// Suggest items similar to `name`: up to `top_n_name` lookalike names
    /// (character similarity at or above the cutoff) plus up to
    /// `top_n_price` price neighbors on each side, deduplicated. Name
    /// matches sort first, then smaller price distance. The target itself
    /// is excluded; an unknown target yields nothing.
    pub fn similar_items(
        &self,
        name: &str,
        top_n_name: usize,
        top_n_price: usize,
    ) -> Vec<(String, ShopItem)> {
        let Some(target) = self.item_info(name) else {
            return Vec::new();
        };

        // Name half: character-level similarity, since item names carry no
        // whitespace to tokenize on.
        let mut ranked: Vec<(&str, f64)> = self
            .store
            .root()
            .keys()
            .map(|k| k.as_str())
            .filter(|n| *n != name)
            .map(|n| (n, similarity_ratio(name, n)))
            .filter(|(_, ratio)| *ratio >= NAME_SIMILARITY_CUTOFF)
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let name_similar: Vec<&str> = ranked
            .into_iter()
            .map(|(n, _)| n)
            .take(top_n_name)
            .collect();

        // Price half: neighbors in ascending price order.
        let mut by_price: Vec<(&str, f64)> = self
            .store
            .root()
            .iter()
            .filter_map(|(n, v)| Self::decode(v).map(|item| (n.as_str(), item.price)))
            .collect();
        by_price.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut price_adjacent: Vec<&str> = Vec::new();
        if let Some(target_idx) = by_price.iter().position(|(n, _)| *n == name) {
            for i in 1..=top_n_price {
                if let Some(idx) = target_idx.checked_sub(i) {
                    price_adjacent.push(by_price[idx].0);
                }
            }
            for i in 1..=top_n_price {
                if let Some((n, _)) = by_price.get(target_idx + i) {
                    price_adjacent.push(n);
                }
            }
        }

        // Merge, name matches first, dedupe by item name.
        let mut combined: Vec<&str> = Vec::new();
        for candidate in name_similar.iter().chain(price_adjacent.iter()) {
            if *candidate != name && !combined.contains(candidate) {
                combined.push(candidate);
            }
        }

        let mut result: Vec<(String, ShopItem, bool)> = combined
            .into_iter()
            .filter_map(|n| self.item_info(n).map(|item| (n.to_string(), item, name_similar.contains(&n))))
            .collect();

        result.sort_by(|a, b| {
            b.2.cmp(&a.2).then_with(|| {
                let da = (a.1.price - target.price).abs();
                let db = (b.1.price - target.price).abs();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
        });

        result.into_iter().map(|(n, item, _)| (n, item)).collect()
    }
}
