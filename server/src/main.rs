use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use todo_server::config::{Config, DEFAULT_LOG_FILTER};
use todo_server::TodoStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;
    let store = TodoStore::open(&config.database_path).await?;

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    todo_server::run(listener, store).await?;
    Ok(())
}
