use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use summarize_ui::{
    config::Config,
    api::routes::create_router,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if it exists; it may carry
    // RUST_LOG, so this runs before the subscriber starts
    dotenv::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!(backend = %config.backend_base_url, "Starting server on {}", server_addr);

    // Build the router with routes
    let app = create_router(AppState::new(config));

    // Create the listener
    let listener = TcpListener::bind(server_addr).await?;

    info!("Listening on http://{}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
