use anyhow::Context;
use clap::Parser;
use item_lending::{
    adapters::memory::InMemoryBookingLedger,
    adapters::mock::{Fixtures, ItemService as MockItemService, UserService as MockUserService},
    adapters::postgres::PostgresBookingLedger,
    api::{handlers::AppState, router::create_router},
    application::booking::ServiceDependencies,
    config::{Config, StorageBackend},
    ports::BookingLedger,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "item_lending=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    // Initialize booking ledger
    let booking_ledger: Arc<dyn BookingLedger> = match config.storage {
        StorageBackend::Postgres => {
            tracing::info!(max_connections = config.max_connections, "Connecting to PostgreSQL");

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await
                .context("Failed to connect to database")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations completed");

            Arc::new(PostgresBookingLedger::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory booking ledger; bookings are lost on restart");
            Arc::new(InMemoryBookingLedger::new())
        }
    };

    // User and item contexts are in-process mocks, optionally seeded from a file
    let user_service = Arc::new(MockUserService::new());
    let item_service = Arc::new(MockItemService::new());
    match &config.fixtures {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read fixtures {}", path.display()))?;
            let fixtures = Fixtures::from_json(&json)
                .with_context(|| format!("Failed to parse fixtures {}", path.display()))?;
            fixtures.apply(&user_service, &item_service);
            tracing::info!(
                users = fixtures.users.len(),
                items = fixtures.items.len(),
                "Loaded fixtures"
            );
        }
        None => {
            tracing::warn!("No fixtures given; user and item catalogs start empty");
        }
    }

    let service_deps = ServiceDependencies {
        booking_ledger,
        user_service,
        item_service,
    };

    let app_state = Arc::new(AppState { service_deps });
    let app = create_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
