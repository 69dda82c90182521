use anyhow::Result;
use reqwest::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::{SourceError, SourceResult};

pub struct WeatherConfig {
    pub host: String,
    pub api_key: String,
}

/// Current conditions for a city, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub description: String,
    pub temperature_c: f64,
    pub humidity_pct: u64,
    pub wind_speed_ms: f64,
}

/// OpenWeatherMap-shaped current weather lookup.
pub struct WeatherClient {
    client: Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn current(&self, city: &str) -> SourceResult<WeatherReport> {
        let url = format!(
            "{}/data/2.5/weather",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("appid", &self.config.api_key),
            ])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let data: Value = response.json().await?;
                Self::parse_report(city, &data)
            }
            StatusCode::NOT_FOUND => Err(SourceError::NotFound(format!(
                "no weather data for '{}'",
                city
            ))),
            status => Err(SourceError::Unavailable(format!(
                "weather service answered {}",
                status
            ))),
        }
    }

    fn parse_report(city: &str, data: &Value) -> SourceResult<WeatherReport> {
        let temperature_c = data["main"]["temp"].as_f64().ok_or_else(|| {
            SourceError::Unavailable("malformed weather payload: missing temperature".to_string())
        })?;

        Ok(WeatherReport {
            city: data["name"].as_str().unwrap_or(city).to_string(),
            description: data["weather"][0]["description"]
                .as_str()
                .unwrap_or("unknown conditions")
                .to_string(),
            temperature_c,
            humidity_pct: data["main"]["humidity"].as_u64().unwrap_or(0),
            wind_speed_ms: data["wind"]["speed"].as_f64().unwrap_or(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(host: String) -> WeatherClient {
        WeatherClient::new(WeatherConfig {
            host,
            api_key: "test-key".to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_current_parses_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Oslo"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Oslo",
                "weather": [{"description": "light rain"}],
                "main": {"temp": 12.3, "humidity": 81},
                "wind": {"speed": 4.6}
            })))
            .mount(&server)
            .await;

        let report = client(server.uri()).current("Oslo").await.unwrap();
        assert_eq!(report.city, "Oslo");
        assert_eq!(report.description, "light rain");
        assert_eq!(report.temperature_c, 12.3);
        assert_eq!(report.humidity_pct, 81);
        assert_eq!(report.wind_speed_ms, 4.6);
    }

    #[tokio::test]
    async fn test_current_unknown_city_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(server.uri()).current("Atlantis").await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_current_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(server.uri()).current("Oslo").await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }
}
