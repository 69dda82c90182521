use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use concierge::agent::Agent;
use concierge::providers::factory;
use concierge::sources::{
    CurrencyClient, CurrencyConfig, PopulationClient, PopulationConfig, WeatherClient,
    WeatherConfig,
};
use concierge::toolbox::Toolbox;

const MAX_PROMPT_CHARS: usize = 2000;

#[derive(Debug, Deserialize)]
struct ChatRequest {
    prompt: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ChatResponse {
    fn success(response: String) -> Self {
        Self {
            ok: true,
            response: Some(response),
            error: None,
        }
    }

    fn failure<S: Into<String>>(error: S) -> Self {
        Self {
            ok: false,
            response: None,
            error: Some(error.into()),
        }
    }
}

// Each request gets its own agent and conversation; the loaded catalog is the
// only shared piece and it is read-only
fn build_agent(state: AppState) -> anyhow::Result<Agent> {
    let weather = WeatherClient::new(WeatherConfig {
        host: state.sources.weather_host,
        api_key: state.sources.weather_api_key,
    })?;
    let population = PopulationClient::new(PopulationConfig {
        host: state.sources.population_host,
    })?;
    let currency = CurrencyClient::new(CurrencyConfig {
        host: state.sources.currency_host,
    })?;

    let toolbox = Toolbox::new(state.store, weather, population, currency);
    let provider = factory::get_provider(state.provider_config)?;

    Ok(Agent::new(provider, toolbox))
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatResponse::failure("prompt must not be empty")),
        );
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatResponse::failure(format!(
                "prompt must be at most {} characters",
                MAX_PROMPT_CHARS
            ))),
        );
    }

    let agent = match build_agent(state) {
        Ok(agent) => agent,
        Err(err) => {
            tracing::error!("failed to build agent: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse::failure("internal error")),
            );
        }
    };

    // Orchestration failures are part of the body contract, not an HTTP error
    match agent.reply(prompt).await {
        Ok(response) => (StatusCode::OK, Json(ChatResponse::success(response))),
        Err(err) => {
            tracing::warn!("chat request failed: {}", err);
            (StatusCode::OK, Json(ChatResponse::failure(err.to_string())))
        }
    }
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::SourceSettings;
    use axum::body::Body;
    use axum::http::Request;
    use concierge::providers::configs::{OpenAiProviderConfig, ProviderConfig};
    use concierge::sources::ProductStore;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            provider_config: ProviderConfig::OpenAi(OpenAiProviderConfig {
                host: "http://localhost:0".to_string(),
                api_key: "test-key".to_string(),
                model: "gpt-4o-mini".to_string(),
                temperature: None,
                max_tokens: None,
            }),
            sources: SourceSettings {
                weather_host: "http://localhost:0".to_string(),
                weather_api_key: "test-key".to_string(),
                population_host: "http://localhost:0".to_string(),
                currency_host: "http://localhost:0".to_string(),
                catalog_path: "unused".to_string(),
            },
            store: Arc::new(ProductStore::new(vec![])),
        }
    }

    async fn post_chat(body: Value) -> (StatusCode, Value) {
        let app = routes(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected() {
        let (status, body) = post_chat(json!({"prompt": "   "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }

    #[tokio::test]
    async fn test_oversized_prompt_is_rejected() {
        let long_prompt = "x".repeat(MAX_PROMPT_CHARS + 1);
        let (status, body) = post_chat(json!({"prompt": long_prompt})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], json!(false));
    }

    #[tokio::test]
    async fn test_unreachable_completions_is_ok_false() {
        // Port 0 is never reachable; the orchestrator's transport failure
        // comes back in the body, not as an HTTP error
        let (status, body) = post_chat(json!({"prompt": "hello"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], json!(false));
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("completion request failed"));
    }
}
