use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: set {env_var}")]
    MissingEnvVar { env_var: String },

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

/// Translate a dotted settings path into the environment variable that
/// supplies it, e.g. `provider.api_key` -> `CONCIERGE_PROVIDER__API_KEY`.
pub fn to_env_var(field: &str) -> String {
    format!("CONCIERGE_{}", field.replace('.', "__").to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_env_var() {
        assert_eq!(to_env_var("provider.api_key"), "CONCIERGE_PROVIDER__API_KEY");
        assert_eq!(
            to_env_var("sources.weather_api_key"),
            "CONCIERGE_SOURCES__WEATHER_API_KEY"
        );
        assert_eq!(to_env_var("type"), "CONCIERGE_TYPE");
    }
}
