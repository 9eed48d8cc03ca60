//! Per-account catch logs ("creels").
//!
//! The backing document is shaped
//! `{account: {"fish_records": [{fish_name, weights: [..]}]}}`. Unlike the
//! other catalog views this one writes: every mutation saves immediately,
//! because catch logs are appended from many short-lived fishing handlers.

use crate::error::StoreError;
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AccountCreel {
    #[serde(default)]
    fish_records: Vec<FishEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FishEntry {
    fish_name: String,
    weights: Vec<f64>,
}

/// One species' log for an account, with derived totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CreelRecord {
    pub fish_name: String,
    pub weights: Vec<f64>,
    pub count: usize,
    pub total_weight: f64,
}

/// Account-wide catch overview.
#[derive(Debug, Clone, PartialEq)]
pub struct CreelSummary {
    pub total_catches: usize,
    pub total_weight: f64,
    pub fish_types: usize,
    /// Total weight per species.
    pub fish_weights: BTreeMap<String, f64>,
}

/// Read-write store of per-account catch logs.
pub struct CreelStore {
    store: DocumentStore,
}

impl CreelStore {
    /// Open (or create) the unified creel file under `root/subdir/file`.
    pub async fn open(
        root: impl AsRef<Path>,
        subdir: &str,
        file: &str,
    ) -> Result<Self, StoreError> {
        Ok(CreelStore {
            store: DocumentStore::open(root, subdir, file).await?,
        })
    }

    fn account(&self, account: &str) -> Option<AccountCreel> {
        let value = self.store.root().get(account)?;
        serde_json::from_value(value.clone()).ok()
    }

    fn put_account(&mut self, account: &str, creel: &AccountCreel) -> Result<(), StoreError> {
        let value: Value = serde_json::to_value(creel)?;
        self.store.root_mut().insert(account.to_string(), value);
        Ok(())
    }

    /// Append one catch. Creates the account and species record as needed
    /// and saves immediately. Non-positive weights are rejected.
    pub async fn add_weight(
        &mut self,
        account: &str,
        fish_name: &str,
        weight: f64,
    ) -> Result<(), StoreError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(StoreError::InvalidValue(format!(
                "weight {} must be a positive number",
                weight
            )));
        }

        let mut creel = self.account(account).unwrap_or_default();
        match creel.fish_records.iter_mut().find(|r| r.fish_name == fish_name) {
            Some(record) => record.weights.push(weight),
            None => creel.fish_records.push(FishEntry {
                fish_name: fish_name.to_string(),
                weights: vec![weight],
            }),
        }
        self.put_account(account, &creel)?;
        self.store.save().await
    }

    /// The log for one species, with totals. Empty when the account or
    /// species has no record.
    pub fn records(&self, account: &str, fish_name: &str) -> Vec<CreelRecord> {
        let Some(creel) = self.account(account) else {
            return Vec::new();
        };
        creel
            .fish_records
            .into_iter()
            .filter(|r| r.fish_name == fish_name)
            .map(|r| {
                let total_weight = r.weights.iter().sum();
                CreelRecord {
                    count: r.weights.len(),
                    total_weight,
                    fish_name: r.fish_name,
                    weights: r.weights,
                }
            })
            .collect()
    }

    /// Account-wide overview. Errors when the account has no creel at all.
    pub fn summary(&self, account: &str) -> Result<CreelSummary, StoreError> {
        let creel = self
            .account(account)
            .ok_or_else(|| StoreError::AccountNotFound(account.to_string()))?;

        let mut summary = CreelSummary {
            total_catches: 0,
            total_weight: 0.0,
            fish_types: creel.fish_records.len(),
            fish_weights: BTreeMap::new(),
        };
        for record in &creel.fish_records {
            let species_total: f64 = record.weights.iter().sum();
            summary.total_catches += record.weights.len();
            summary.total_weight += species_total;
            *summary
                .fish_weights
                .entry(record.fish_name.clone())
                .or_insert(0.0) += species_total;
        }
        Ok(summary)
    }

    /// Price a species' whole log: `(total_weight / average_weight) ×
    /// average_price`, rounded to the nearest whole amount with ties
    /// going to the even neighbor (2.5 pays 2, 3.5 pays 4).
    pub fn total_amount(
        &self,
        account: &str,
        fish_name: &str,
        average_price: i64,
        average_weight: f64,
    ) -> Result<i64, StoreError> {
        let creel = self
            .account(account)
            .ok_or_else(|| StoreError::AccountNotFound(account.to_string()))?;
        let record = creel
            .fish_records
            .iter()
            .find(|r| r.fish_name == fish_name)
            .ok_or_else(|| StoreError::RecordNotFound {
                account: account.to_string(),
                name: fish_name.to_string(),
            })?;

        if record.weights.is_empty() {
            return Err(StoreError::InvalidValue(format!(
                "no weights recorded for '{}'",
                fish_name
            )));
        }
        if average_weight <= 0.0 {
            return Err(StoreError::InvalidValue(format!(
                "average weight {} must be positive",
                average_weight
            )));
        }

        let total_weight: f64 = record.weights.iter().sum();
        let amount = total_weight / average_weight * average_price as f64;
        Ok(amount.round_ties_even() as i64)
    }

    /// Remove a species' log from an account and save. Errors when the
    /// account or species is unknown.
    pub async fn delete(&mut self, account: &str, fish_name: &str) -> Result<(), StoreError> {
        let mut creel = self
            .account(account)
            .ok_or_else(|| StoreError::AccountNotFound(account.to_string()))?;
        let index = creel
            .fish_records
            .iter()
            .position(|r| r.fish_name == fish_name)
            .ok_or_else(|| StoreError::RecordNotFound {
                account: account.to_string(),
                name: fish_name.to_string(),
            })?;

        creel.fish_records.remove(index);
        self.put_account(account, &creel)?;
        self.store.save().await
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }
}
