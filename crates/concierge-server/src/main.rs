mod configuration;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use concierge::sources::ProductStore;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::configuration::Settings;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let settings = Settings::new()?;
    let addr = settings.server.socket_addr();
    let catalog_path = settings.sources.catalog_path.clone();

    let store = Arc::new(ProductStore::from_path(&catalog_path)?);
    info!("loaded {} products from {}", store.len(), catalog_path);

    let state = AppState {
        provider_config: settings.provider.into_config(),
        sources: settings.sources,
        store,
    };

    // Create router with CORS support
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::configure(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
