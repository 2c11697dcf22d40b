use stockline_backend::config::Config;
use stockline_backend::create_app;
use stockline_db::Database;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    // Initialize tracing for structured logging
    #[cfg(debug_assertions)]
    let log_level = tracing::Level::DEBUG;
    #[cfg(not(debug_assertions))]
    let log_level = tracing::Level::INFO;

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();
    tracing::info!("Starting Stockline backend server...");

    // Load configuration from environment variables or use defaults
    let config = Config::from_env();
    tracing::info!(
        "Configuration: port={}, db_path={}, body_limit={}KB, timeout={}s",
        config.port,
        config.database_path,
        config.request_body_limit / 1024,
        config.request_timeout.as_secs(),
    );
    if config.jwt_key.is_none() {
        tracing::warn!("JWT_KEY is not set; login and protected routes will fail");
    }

    let db = Database::open(&config.database_path).await.unwrap();
    let app = create_app(
        db,
        config.jwt_key.clone(),
        config.request_body_limit,
        config.request_timeout,
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
