//! Fish species catalog view.

use crate::store::DocumentStore;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One fish species. `bait` lists which bait values can catch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishRecord {
    #[serde(default)]
    pub bait: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read-only lookup view over a fish species document.
pub struct FishCatalog {
    store: DocumentStore,
}

impl FishCatalog {
    pub fn new(store: DocumentStore) -> Self {
        FishCatalog { store }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    fn decode(value: &Value) -> Option<FishRecord> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Exact lookup by species name.
    pub fn species_info(&self, name: &str) -> Option<FishRecord> {
        Self::decode(self.store.root().get(name)?)
    }

    /// All species a given bait can catch, in catalog order.
    pub fn species_for_bait(&self, bait: &str) -> Vec<(String, FishRecord)> {
        self.store
            .root()
            .iter()
            .filter_map(|(name, value)| {
                let fish = Self::decode(value)?;
                if fish.bait.iter().any(|b| b == bait) {
                    Some((name.clone(), fish))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Uniform random pick among the species this bait can catch (not
    /// weighted by any species attribute). `None` when nothing bites.
    pub fn random_by_bait(&self, bait: &str) -> Option<(String, FishRecord)> {
        let matching = self.species_for_bait(bait);
        matching.choose(&mut rand::thread_rng()).cloned()
    }
}
