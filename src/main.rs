//! Garage Workshop API server.
//!
//! ```bash
//! GARAGE_WORKSHOP__DATABASE__URL=postgres://localhost/garage \
//! GARAGE_WORKSHOP__AUTH__JWT_SECRET=dev-secret \
//! cargo run
//! ```

use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use garage_workshop::adapters::http::middleware::AuthState;
use garage_workshop::adapters::http::{api_router, with_http_layers, BookingHandlers};
use garage_workshop::adapters::{JwtSessionValidator, PostgresBookingRepository, TracingEventPublisher};
use garage_workshop::config::{AppConfig, ServerConfig};
use garage_workshop::ports::EventPublisher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server);

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    tracing::info!("Database pool ready");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied");
    }

    let repository = Arc::new(PostgresBookingRepository::new(pool));
    let publisher: Arc<dyn EventPublisher> = Arc::new(TracingEventPublisher::new());
    let validator: AuthState = Arc::new(JwtSessionValidator::new(
        &config.auth.jwt_secret,
        config.auth.issuer.as_deref(),
        config.auth.leeway_secs,
    ));

    let handlers = BookingHandlers::from_ports(repository.clone(), repository, publisher);
    let app = with_http_layers(
        api_router(handlers, validator),
        config.server.request_timeout(),
        &config.server.cors_origins_list(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Garage workshop API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.json_logs() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
