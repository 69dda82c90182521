use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::{Tool, ToolCall};
use crate::sources::{
    CurrencyClient, PopulationClient, PopulationCount, ProductRecord, ProductStore, WeatherClient,
    WeatherReport,
};

/// Outcome of a single tool invocation. Collaborator failures are carried as
/// `Failed` so the follow-up completion round can apologize or degrade
/// gracefully; they never abort the request.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolReport {
    Products(Vec<ProductRecord>),
    Weather(WeatherReport),
    Population(PopulationCount),
    Currency(Conversion),
    Failed { tool: String, reason: String },
}

/// A currency conversion quote. `converted` is `value * rate`, unrounded.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub value: f64,
    pub base: String,
    pub target: String,
    pub rate: f64,
    pub converted: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchArgs {
    query: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CityArgs {
    city: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConvertArgs {
    value: f64,
    base: String,
    target: String,
}

/// The catalog offered to the model on the first completion round. Read-only;
/// the same sequence every call.
pub fn catalog() -> Vec<Tool> {
    vec![
        Tool::new(
            "search_products",
            "Search the shop catalog for products matching a free-text query",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Words to look for in product titles, e.g. 'shirt'"
                    }
                },
                "required": ["query"]
            }),
        ),
        Tool::new(
            "get_weather",
            "Get the current weather conditions for a city",
            json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "City name, e.g. 'Oslo'"
                    }
                },
                "required": ["city"]
            }),
        ),
        Tool::new(
            "get_population",
            "Get the most recent population count for a city",
            json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "City name, e.g. 'Oslo'"
                    }
                },
                "required": ["city"]
            }),
        ),
        Tool::new(
            "convert_currency",
            "Convert an amount from one currency to another at the current exchange rate",
            json!({
                "type": "object",
                "properties": {
                    "value": {
                        "type": "number",
                        "description": "Amount in the base currency"
                    },
                    "base": {
                        "type": "string",
                        "description": "ISO 4217 code of the currency to convert from, e.g. 'USD'"
                    },
                    "target": {
                        "type": "string",
                        "description": "ISO 4217 code of the currency to convert to, e.g. 'EUR'"
                    }
                },
                "required": ["value", "base", "target"]
            }),
        ),
    ]
}

/// Closed name-to-handler mapping over the four collaborators. Unknown names
/// are a detectable error, not a crash; handlers never see conversation
/// state.
pub struct Toolbox {
    store: Arc<ProductStore>,
    weather: WeatherClient,
    population: PopulationClient,
    currency: CurrencyClient,
}

impl Toolbox {
    pub fn new(
        store: Arc<ProductStore>,
        weather: WeatherClient,
        population: PopulationClient,
        currency: CurrencyClient,
    ) -> Self {
        Self {
            store,
            weather,
            population,
            currency,
        }
    }

    /// Execute a single tool call. Argument problems and unknown tool names
    /// are orchestrator-level errors; collaborator failures degrade to
    /// `ToolReport::Failed`.
    pub async fn dispatch(&self, call: &ToolCall) -> AgentResult<ToolReport> {
        match call.name.as_str() {
            "search_products" => {
                let args: SearchArgs = parse_args(call)?;
                Ok(ToolReport::Products(self.store.search(&args.query)))
            }
            "get_weather" => {
                let args: CityArgs = parse_args(call)?;
                Ok(match self.weather.current(&args.city).await {
                    Ok(report) => ToolReport::Weather(report),
                    Err(err) => ToolReport::Failed {
                        tool: call.name.clone(),
                        reason: err.to_string(),
                    },
                })
            }
            "get_population" => {
                let args: CityArgs = parse_args(call)?;
                Ok(match self.population.city_population(&args.city).await {
                    Ok(count) => ToolReport::Population(count),
                    Err(err) => ToolReport::Failed {
                        tool: call.name.clone(),
                        reason: err.to_string(),
                    },
                })
            }
            "convert_currency" => {
                let args: ConvertArgs = parse_args(call)?;
                Ok(
                    match self.currency.exchange_rate(&args.base, &args.target).await {
                        Ok(rate) => ToolReport::Currency(Conversion {
                            converted: args.value * rate,
                            value: args.value,
                            base: args.base,
                            target: args.target,
                            rate,
                        }),
                        Err(err) => ToolReport::Failed {
                            tool: call.name.clone(),
                            reason: err.to_string(),
                        },
                    },
                )
            }
            other => Err(AgentError::ToolNotFound(other.to_string())),
        }
    }
}

fn parse_args<T: DeserializeOwned>(call: &ToolCall) -> AgentResult<T> {
    serde_json::from_value(call.arguments.clone())
        .map_err(|e| AgentError::InvalidArguments(format!("{}: {}", call.name, e)))
}
