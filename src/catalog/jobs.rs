//! Job catalog view.
//!
//! The backing document is shaped `{series: {code: job}}`: a 4-digit job
//! code whose first two digits name the series (`"2001"` belongs to series
//! `"20"`). There is no explicit linked list between ranks; the promotion
//! chain of a series is simply its codes in numeric order, and "next job"
//! is the adjacent element.

use crate::catalog::fuzzy::{match_score, tokenize};
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One job listing. Extra catalog fields (salary, requirements, ...) ride
/// along untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "jobName")]
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read-only lookup view over a job catalog document.
pub struct JobCatalog {
    store: DocumentStore,
}

impl JobCatalog {
    pub fn new(store: DocumentStore) -> Self {
        JobCatalog { store }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    fn series_of(code: &str) -> Option<&str> {
        if code.len() == 4 && code.chars().all(|c| c.is_ascii_digit()) {
            Some(&code[..2])
        } else {
            None
        }
    }

    fn series_map(&self, series: &str) -> Option<&Map<String, Value>> {
        self.store.root().get(series)?.as_object()
    }

    /// Codes of a series in numeric order. Non-numeric keys are skipped.
    fn sorted_codes(jobs: &Map<String, Value>) -> Vec<&str> {
        let mut codes: Vec<(&str, u64)> = jobs
            .keys()
            .filter_map(|k| k.parse::<u64>().ok().map(|n| (k.as_str(), n)))
            .collect();
        codes.sort_by_key(|(_, n)| *n);
        codes.into_iter().map(|(k, _)| k).collect()
    }

    fn decode(value: &Value) -> Option<JobRecord> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Exact lookup by 4-digit code. Invalid or unknown codes yield `None`.
    pub fn job_info(&self, code: &str) -> Option<JobRecord> {
        let series = Self::series_of(code)?;
        Self::decode(self.series_map(series)?.get(code)?)
    }

    /// The adjacent successor of `code` within its series, in numeric code
    /// order. `None` when the code is unknown or already last in its chain.
    pub fn next_job(&self, code: &str) -> Option<JobRecord> {
        let series = Self::series_of(code)?;
        let jobs = self.series_map(series)?;
        let codes = Self::sorted_codes(jobs);
        let index = codes.iter().position(|c| *c == code)?;
        let next = codes.get(index + 1)?;
        Self::decode(jobs.get(*next)?)
    }

    /// Names of all strictly-higher jobs in the series, ascending.
    pub fn promote_chain(&self, code: &str) -> Vec<String> {
        let Some(series) = Self::series_of(code) else {
            return Vec::new();
        };
        let Some(jobs) = self.series_map(series) else {
            return Vec::new();
        };
        Self::sorted_codes(jobs)
            .into_iter()
            .filter(|c| *c > code)
            .filter_map(|c| Self::decode(jobs.get(c)?).map(|job| job.name))
            .collect()
    }

    /// How many strictly-higher jobs remain in the series.
    pub fn promote_count(&self, code: &str) -> usize {
        let Some(series) = Self::series_of(code) else {
            return 0;
        };
        let Some(jobs) = self.series_map(series) else {
            return 0;
        };
        jobs.keys().filter(|k| k.as_str() > code).count()
    }

    /// The last ⌈n/3⌉ codes of the series, in numeric order — the "senior
    /// tier" of a chain with n ranks.
    pub fn senior_codes(&self, code: &str) -> Vec<String> {
        let Some(series) = Self::series_of(code) else {
            return Vec::new();
        };
        let Some(jobs) = self.series_map(series) else {
            return Vec::new();
        };
        let codes = Self::sorted_codes(jobs);
        if codes.is_empty() {
            return Vec::new();
        }
        let take = codes.len().div_ceil(3);
        codes[codes.len() - take..]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    /// Fuzzy search over job names, best match first. Multi-keyword queries
    /// are supported (whitespace-separated).
    pub fn search(&self, query: &str) -> Vec<JobRecord> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(JobRecord, f64, usize)> = Vec::new();
        for jobs in self.store.root().values() {
            let Some(jobs) = jobs.as_object() else {
                continue;
            };
            for value in jobs.values() {
                let Some(job) = Self::decode(value) else {
                    continue;
                };
                let lower = job.name.trim().to_lowercase();
                if lower.is_empty() {
                    continue;
                }
                let score = match_score(&lower, &tokens);
                if score > 0.0 {
                    let matched = tokens.iter().filter(|t| lower.contains(t.as_str())).count();
                    matches.push((job, score, matched));
                }
            }
        }

        matches.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.2.cmp(&a.2))
                .then(a.0.name.chars().count().cmp(&b.0.name.chars().count()))
        });
        matches.into_iter().map(|(job, _, _)| job).collect()
    }

    /// Every `(jobName, company)` pair in the catalog, trimmed. Entries
    /// missing either field are skipped.
    pub fn jobs_and_companies(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for jobs in self.store.root().values() {
            let Some(jobs) = jobs.as_object() else {
                continue;
            };
            for value in jobs.values() {
                let Some(job) = Self::decode(value) else {
                    continue;
                };
                let name = job.name.trim();
                let company = job.company.as_deref().unwrap_or("").trim();
                if !name.is_empty() && !company.is_empty() {
                    out.push((name.to_string(), company.to_string()));
                }
            }
        }
        out
    }
}
