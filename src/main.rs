use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{Level, info};

use yjsite::cache::ResponseCache;
use yjsite::config::AppConfig;
use yjsite::database::init_db;
use yjsite::state::AppState;
use yjsite::storage::ObjectStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = init_db(&config.database.url).await?;
    info!("Database connected and schema synchronized");

    let storage = ObjectStorage::from_config(&config.oss)?;
    let cache = ResponseCache::new(Duration::from_secs(config.cache.ttl_secs));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState {
        db,
        cache: Arc::new(cache),
        storage: Arc::new(storage),
        config: Arc::new(config),
    };

    let app = yjsite::build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
