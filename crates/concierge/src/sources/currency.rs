use anyhow::Result;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

use super::{SourceError, SourceResult};

pub struct CurrencyConfig {
    pub host: String,
}

/// open-er-api-shaped exchange rate lookup. One call fetches the whole rate
/// table for the base currency; the target is picked out of it.
pub struct CurrencyClient {
    client: Client,
    config: CurrencyConfig,
}

impl CurrencyClient {
    pub fn new(config: CurrencyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, config })
    }

    /// The upstream-quoted rate for `target` against `base`
    pub async fn exchange_rate(&self, base: &str, target: &str) -> SourceResult<f64> {
        let base = base.to_uppercase();
        let target = target.to_uppercase();
        let url = format!(
            "{}/v6/latest/{}",
            self.config.host.trim_end_matches('/'),
            base
        );

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let data: Value = response.json().await?;
                if data["result"].as_str() == Some("error") {
                    return Err(match data["error-type"].as_str() {
                        Some("unsupported-code") => {
                            SourceError::NotFound(format!("unsupported currency: {}", base))
                        }
                        other => SourceError::Unavailable(format!(
                            "currency service error: {}",
                            other.unwrap_or("unknown")
                        )),
                    });
                }

                data["rates"][target.as_str()].as_f64().ok_or_else(|| {
                    SourceError::NotFound(format!("unsupported currency: {}", target))
                })
            }
            StatusCode::NOT_FOUND => Err(SourceError::NotFound(format!(
                "unsupported currency: {}",
                base
            ))),
            status => Err(SourceError::Unavailable(format!(
                "currency service answered {}",
                status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(host: String) -> CurrencyClient {
        CurrencyClient::new(CurrencyConfig { host }).unwrap()
    }

    #[tokio::test]
    async fn test_exchange_rate_picks_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v6/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "base_code": "USD",
                "rates": {"USD": 1.0, "EUR": 0.9, "NOK": 10.5}
            })))
            .mount(&server)
            .await;

        let rate = client(server.uri()).exchange_rate("usd", "eur").await.unwrap();
        assert_eq!(rate, 0.9);
    }

    #[tokio::test]
    async fn test_exchange_rate_unknown_target_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v6/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "rates": {"USD": 1.0, "EUR": 0.9}
            })))
            .mount(&server)
            .await;

        let err = client(server.uri())
            .exchange_rate("USD", "XXX")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_exchange_rate_unsupported_base() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v6/latest/ZZZ"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "error",
                "error-type": "unsupported-code"
            })))
            .mount(&server)
            .await;

        let err = client(server.uri())
            .exchange_rate("ZZZ", "EUR")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_exchange_rate_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v6/latest/USD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(server.uri())
            .exchange_rate("USD", "EUR")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }
}
