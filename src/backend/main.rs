/**
 * pbchat Server Entry Point
 *
 * Loads configuration from the environment (and `.env`), selects the record
 * store and serves the auth and room routes.
 */

#[cfg(feature = "ssr")]
use pbchat::backend::server::StartupError;

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    // Initialize tracing with INFO level by default
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = pbchat::shared::AppConfig::from_env()?;
    let app = pbchat::backend::server::init::create_app(&config)?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.api_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://127.0.0.1:{}", config.api_port);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin pbchat-server --features ssr");
    std::process::exit(1);
}
