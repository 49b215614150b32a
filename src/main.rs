//! Web Application API Server
//!
//! Runs the HTTP API with every route group enabled. Configuration comes from
//! the environment (see `.env.example`); `STORAGE_BACKEND=memory` runs without
//! PostgreSQL for local development.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use chrono::Duration;
use dotenv::dotenv;
use env_logger::Env;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use webapp_api::{
    api::{AppState, RouterBuilder},
    config::{AppConfig, ServerConfig},
    database::{run_migrations, StorageBackend},
    service::JwtService,
    store::{ItemStore, MemoryStore, PgStore, UserStore},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv().ok();

    let config = AppConfig::from_env()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(&config.server.log_level))
        .init();

    log::info!("🚀 Starting Web Application API v{}", webapp_api::VERSION);

    config.validate()?;
    log::info!("✅ Configuration loaded and validated");

    let (users, items): (Arc<dyn UserStore>, Arc<dyn ItemStore>) = match config.database.backend {
        StorageBackend::Postgres => {
            let database_pool = config.database.create_pool().await?;

            log::info!("🔄 Running database migrations...");
            run_migrations(&database_pool).await?;
            log::info!("✅ Database migrations completed");

            let store = Arc::new(PgStore::new(database_pool));
            (store.clone(), store)
        }
        StorageBackend::Memory => {
            log::warn!("⚠️  Using in-memory store; all data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store)
        }
    };

    let jwt_service = Arc::new(JwtService::with_expiration(
        &config.jwt.secret,
        config.jwt.issuer.clone(),
        Duration::hours(config.jwt.expires_hours),
    ));

    let app_state = AppState::new(users, items, jwt_service, config.security.bcrypt_cost);
    log::info!("✅ Services initialized");
    log::info!("   - Token lifetime: {}h", config.jwt.expires_hours);
    log::info!("   - bcrypt cost: {}", config.security.bcrypt_cost);

    let app = RouterBuilder::with_all_routes()
        .security_headers(config.security.security_headers)
        .build(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.server))
                .layer(DefaultBodyLimit::max(config.server.max_request_size))
                .into_inner(),
        );

    log::info!("📋 API Endpoints:");
    log::info!("     GET    /health");
    log::info!("     POST   /api/auth/register");
    log::info!("     POST   /api/auth/login");
    log::info!("     GET    /api/auth/profile        (token)");
    log::info!("     GET    /api/users               (admin)");
    log::info!("     GET    /api/users/{{id}}          (owner or admin)");
    log::info!("     PUT    /api/users/{{id}}          (owner or admin)");
    log::info!("     DELETE /api/users/{{id}}          (owner or admin)");
    log::info!("     GET    /api/items?limit=&page=&sort=&search=");
    log::info!("     GET    /api/items/{{id}}");
    log::info!("     POST   /api/items               (token)");
    log::info!("     PUT    /api/items/{{id}}          (owner or admin)");
    log::info!("     DELETE /api/items/{{id}}          (owner or admin)");

    let bind_addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("🌐 Listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if server.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
