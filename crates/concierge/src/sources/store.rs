use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One record in the flat, append-only product catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    #[serde(default)]
    pub embedding_text: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub discount: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub variants: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// In-memory catalog, loaded once at startup and shared read-only across
/// requests.
pub struct ProductStore {
    records: Vec<ProductRecord>,
}

impl ProductStore {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    /// Load the catalog from a JSON array of records
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file {}", path.display()))?;
        let records: Vec<ProductRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse catalog file {}", path.display()))?;
        Ok(Self::new(records))
    }

    /// Case-insensitive substring match of the query against each record's
    /// title. Matches come back most recent first; ties keep their original
    /// order (stable sort). Zero matches is a valid, successful outcome.
    pub fn search(&self, query: &str) -> Vec<ProductRecord> {
        let needle = query.to_lowercase();
        let mut matches: Vec<ProductRecord> = self
            .records
            .iter()
            .filter(|record| record.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matches
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
