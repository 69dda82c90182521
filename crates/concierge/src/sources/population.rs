use anyhow::Result;
use reqwest::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use super::{SourceError, SourceResult};

pub struct PopulationConfig {
    pub host: String,
}

/// The most recent population count known for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationCount {
    pub city: String,
    pub population: u64,
}

/// countriesnow-shaped city population lookup. The upstream reports a series
/// of yearly counts per city; the latest year wins.
pub struct PopulationClient {
    client: Client,
    config: PopulationConfig,
}

impl PopulationClient {
    pub fn new(config: PopulationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn city_population(&self, city: &str) -> SourceResult<PopulationCount> {
        let url = format!(
            "{}/api/v0.1/countries/population/cities",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({ "city": city }))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let data: Value = response.json().await?;
                Self::parse_count(city, &data)
            }
            StatusCode::NOT_FOUND => Err(SourceError::NotFound(format!(
                "no population data for '{}'",
                city
            ))),
            status => Err(SourceError::Unavailable(format!(
                "population service answered {}",
                status
            ))),
        }
    }

    fn parse_count(city: &str, data: &Value) -> SourceResult<PopulationCount> {
        if data["error"].as_bool().unwrap_or(false) {
            return Err(SourceError::NotFound(format!(
                "no population data for '{}'",
                city
            )));
        }

        let counts = data["data"]["populationCounts"].as_array().ok_or_else(|| {
            SourceError::Unavailable("malformed population payload".to_string())
        })?;

        // Counts are keyed by year; take the most recent one
        let latest = counts
            .iter()
            .filter_map(|count| {
                let year = count["year"].as_str()?.trim().parse::<i32>().ok()?;
                let value = parse_count_value(&count["value"])?;
                Some((year, value))
            })
            .max_by_key(|(year, _)| *year);

        match latest {
            Some((_, population)) => Ok(PopulationCount {
                city: data["data"]["city"].as_str().unwrap_or(city).to_string(),
                population,
            }),
            None => Err(SourceError::NotFound(format!(
                "no population data for '{}'",
                city
            ))),
        }
    }
}

// Upstream counts arrive as strings, occasionally with a decimal point
fn parse_count_value(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value
        .as_str()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .map(|n| n as u64)
}
