use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use time::Duration;
use tower_http::cors::CorsLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use debt_tracker_server::{
    AppState, clock::SystemClock, config::Config, constants::*, database, routes::routes,
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "debt_tracker_server=info,tower_http=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| format!("Configuration error: {}", e))?;

    let db = database::init_db(&config.data_path)
        .await
        .map_err(|e| format!("Failed to initialize database: {}", e))?;

    let app_state = AppState {
        db,
        clock: Arc::new(SystemClock::new(config.utc_offset)),
    };

    // TODO: swap MemoryStore for a persistent store so sessions survive restarts
    let store = MemoryStore::default();

    let session_key = Key::try_from(config.session_secret.as_bytes())
        .map_err(|e| format!("Invalid session secret: {}", e))?;

    let session_layer = SessionManagerLayer::new(store)
        .with_secure(config.production)
        .with_name(SESSION_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_EXPIRY_DAYS)))
        .with_signed(session_key);

    let frontend_origin = config
        .frontend_origin
        .parse::<HeaderValue>()
        .map_err(|e| format!("Invalid FRONTEND_ORIGIN '{}': {}", config.frontend_origin, e))?;

    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true);

    let app = routes()
        .layer(cors)
        .layer(session_layer)
        .with_state(app_state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", bind_address, e))?;

    info!("listening on http://{}", bind_address);

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    Ok(())
}
