pub mod currency;
pub mod population;
pub mod store;
pub mod weather;

pub use currency::{CurrencyClient, CurrencyConfig};
pub use population::{PopulationClient, PopulationConfig, PopulationCount};
pub use store::{ProductRecord, ProductStore};
pub use weather::{WeatherClient, WeatherConfig, WeatherReport};

use thiserror::Error;

/// Failures surfaced by an external data collaborator. These never abort a
/// request; the toolbox degrades them into an explanatory tool outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The upstream was unreachable or answered with a non-success status
    #[error("upstream error: {0}")]
    Unavailable(String),

    /// The upstream answered but does not know the requested entity
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Unavailable(err.to_string())
    }
}

pub type SourceResult<T> = Result<T, SourceError>;
